//! Coordinates and forward-geocoding results.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
///
/// Only constructible through [`Coordinate::new`], which rejects non-finite
/// values and anything outside `[-90, 90] x [-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude).ok_or_else(|| {
            format!(
                "coordinate out of range: {}, {}",
                raw.latitude, raw.longitude
            )
        })
    }
}

impl Coordinate {
    /// Returns `None` unless both components are finite and in range.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Formats the coordinate as a map-centre hint, e.g. `@-6.2,106.8,14z`.
    #[must_use]
    pub fn center_hint(&self, zoom: u8) -> String {
        format!("@{},{},{zoom}z", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Where a resolved coordinate came from.
///
/// Variants are listed in cascade priority order; [`CoordinateSource::Gazetteer`]
/// is the static fallback consulted after every payload field misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    LocationList,
    CenterHint,
    LocalResults,
    MapsResults,
    KnowledgeGraph,
    PlaceResult,
    SearchInformation,
    PlaceLink,
    Gazetteer,
}

impl std::fmt::Display for CoordinateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CoordinateSource::LocationList => "location_list",
            CoordinateSource::CenterHint => "center_hint",
            CoordinateSource::LocalResults => "local_results",
            CoordinateSource::MapsResults => "maps_results",
            CoordinateSource::KnowledgeGraph => "knowledge_graph",
            CoordinateSource::PlaceResult => "place_result",
            CoordinateSource::SearchInformation => "search_information",
            CoordinateSource::PlaceLink => "place_link",
            CoordinateSource::Gazetteer => "gazetteer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeStatus {
    Ok,
    ZeroResults,
}

/// Outcome of forward geocoding.
///
/// `coordinate` is present iff `status` is [`GeocodeStatus::Ok`]; the two
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub coordinate: Option<Coordinate>,
    pub status: GeocodeStatus,
    pub source: Option<CoordinateSource>,
}

impl GeocodeResult {
    #[must_use]
    pub fn resolved(
        formatted_address: impl Into<String>,
        coordinate: Coordinate,
        source: CoordinateSource,
    ) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            coordinate: Some(coordinate),
            status: GeocodeStatus::Ok,
            source: Some(source),
        }
    }

    #[must_use]
    pub fn zero_results(formatted_address: impl Into<String>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            coordinate: None,
            status: GeocodeStatus::ZeroResults,
            source: None,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == GeocodeStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_some());
        assert!(Coordinate::new(-90.0, -180.0).is_some());
        assert!(Coordinate::new(0.0, 0.0).is_some());
    }

    #[test]
    fn coordinate_rejects_out_of_range_and_non_finite() {
        assert!(Coordinate::new(90.01, 0.0).is_none());
        assert!(Coordinate::new(0.0, -180.5).is_none());
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn center_hint_includes_zoom() {
        let c = Coordinate::new(-6.9175, 107.6191).unwrap();
        assert_eq!(c.center_hint(14), "@-6.9175,107.6191,14z");
    }

    #[test]
    fn coordinate_deserialize_validates_range() {
        let ok: Coordinate =
            serde_json::from_value(serde_json::json!({"latitude": 1.5, "longitude": 2.5}))
                .expect("valid coordinate");
        assert!((ok.latitude() - 1.5).abs() < f64::EPSILON);

        let bad = serde_json::from_value::<Coordinate>(
            serde_json::json!({"latitude": 123.0, "longitude": 2.5}),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn zero_results_has_no_coordinate() {
        let result = GeocodeResult::zero_results("Nowhere");
        assert_eq!(result.status, GeocodeStatus::ZeroResults);
        assert!(result.coordinate.is_none());
        assert!(result.source.is_none());
        assert!(!result.is_ok());
    }

    #[test]
    fn status_serializes_screaming_case() {
        let result = GeocodeResult::zero_results("Nowhere");
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["status"], "ZERO_RESULTS");

        let c = Coordinate::new(1.0, 2.0).unwrap();
        let json = serde_json::to_value(GeocodeResult::resolved(
            "Somewhere",
            c,
            CoordinateSource::CenterHint,
        ))
        .expect("serialize");
        assert_eq!(json["status"], "OK");
        assert_eq!(json["source"], "center_hint");
        assert_eq!(json["coordinate"]["latitude"], 1.0);
    }
}
