//! Ordered coordinate extraction strategies for a forward-geocoding payload.
//!
//! [`CASCADE`] lists one pure extractor per payload location, most specific
//! first. [`run_cascade`] evaluates them in order against a single payload and
//! stops at the first hit. Every candidate passes through
//! [`Coordinate::new`], so an out-of-range value counts as a miss.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use wisata_core::{Coordinate, CoordinateSource};

use crate::payload::{coordinate_fields, first, gps_coordinates, loose_f64, path, str_at};

/// `@lat,lng` with an optional `,<zoom>z` suffix.
static CENTER_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)(?:,(\d+(?:\.\d+)?)z)?")
        .expect("valid regex")
});

/// `ll=lat,lng` as a query parameter, `,` optionally percent-encoded.
static LL_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]ll=(-?\d+(?:\.\d+)?)(?:,|%2C|%2c)(-?\d+(?:\.\d+)?)").expect("valid regex")
});

/// A coordinate found in the payload plus an optional display label taken
/// from the same record.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub coordinate: Coordinate,
    pub label: Option<String>,
}

impl Extraction {
    fn bare(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: None,
        }
    }

    fn labelled(coordinate: Coordinate, record: &Value) -> Self {
        Self {
            coordinate,
            label: str_at(record, &["title"]).map(str::to_string),
        }
    }
}

/// One entry in the cascade.
pub struct Strategy {
    pub source: CoordinateSource,
    pub extract: fn(&Value) -> Option<Extraction>,
}

/// Extraction strategies in fixed priority order.
pub const CASCADE: &[Strategy] = &[
    Strategy {
        source: CoordinateSource::LocationList,
        extract: from_location_list,
    },
    Strategy {
        source: CoordinateSource::CenterHint,
        extract: from_center_hint,
    },
    Strategy {
        source: CoordinateSource::LocalResults,
        extract: from_local_results,
    },
    Strategy {
        source: CoordinateSource::MapsResults,
        extract: from_maps_results,
    },
    Strategy {
        source: CoordinateSource::KnowledgeGraph,
        extract: from_knowledge_graph,
    },
    Strategy {
        source: CoordinateSource::PlaceResult,
        extract: from_place_result,
    },
    Strategy {
        source: CoordinateSource::SearchInformation,
        extract: from_search_information,
    },
    Strategy {
        source: CoordinateSource::PlaceLink,
        extract: from_place_link,
    },
];

/// Runs [`CASCADE`] against `payload`, returning the first hit and its source.
#[must_use]
pub fn run_cascade(payload: &Value) -> Option<(CoordinateSource, Extraction)> {
    CASCADE.iter().find_map(|strategy| {
        let hit = (strategy.extract)(payload)?;
        Some((strategy.source, hit))
    })
}

/// `locations[]`: first record carrying direct `latitude`/`longitude`.
pub fn from_location_list(payload: &Value) -> Option<Extraction> {
    path(payload, &["locations"])?
        .as_array()?
        .iter()
        .find_map(|record| {
            coordinate_fields(record, "latitude", "longitude")
                .map(|c| Extraction::labelled(c, record))
        })
}

/// `search_parameters.ll` of the form `@lat,lng[,zoomz]`.
pub fn from_center_hint(payload: &Value) -> Option<Extraction> {
    let hint = str_at(payload, &["search_parameters", "ll"])?;
    parse_center_hint(hint).map(Extraction::bare)
}

/// `local_results[0].gps_coordinates`.
pub fn from_local_results(payload: &Value) -> Option<Extraction> {
    let record = first(payload, &["local_results"])?;
    gps_coordinates(record).map(|c| Extraction::labelled(c, record))
}

/// `maps_results[0].gps_coordinates`.
pub fn from_maps_results(payload: &Value) -> Option<Extraction> {
    let record = first(payload, &["maps_results"])?;
    gps_coordinates(record).map(|c| Extraction::labelled(c, record))
}

/// `knowledge_graph.gps_coordinates`.
pub fn from_knowledge_graph(payload: &Value) -> Option<Extraction> {
    let record = path(payload, &["knowledge_graph"])?;
    gps_coordinates(record).map(|c| Extraction::labelled(c, record))
}

/// `place_results.gps_coordinates`, else `place_results.data.{latitude,longitude}`.
pub fn from_place_result(payload: &Value) -> Option<Extraction> {
    let record = path(payload, &["place_results"])?;
    gps_coordinates(record)
        .or_else(|| {
            record
                .get("data")
                .and_then(|data| coordinate_fields(data, "latitude", "longitude"))
        })
        .map(|c| Extraction::labelled(c, record))
}

/// `search_information.location.coordinates` as an object or a `[lat, lng]` pair.
pub fn from_search_information(payload: &Value) -> Option<Extraction> {
    let coordinates = path(payload, &["search_information", "location", "coordinates"])?;
    let coordinate = match coordinates {
        Value::Array(pair) if pair.len() == 2 => {
            Coordinate::new(loose_f64(&pair[0])?, loose_f64(&pair[1])?)
        }
        Value::Object(_) => coordinate_fields(coordinates, "latitude", "longitude"),
        _ => None,
    }?;
    Some(Extraction::bare(coordinate))
}

/// `place_results.link` containing `ll=lat,lng` or `@lat,lng`.
pub fn from_place_link(payload: &Value) -> Option<Extraction> {
    let link = str_at(payload, &["place_results", "link"])?;
    parse_link_coordinate(link).map(Extraction::bare)
}

/// Parses `@lat,lng` (optionally `,zoomz`) out of a centre hint string.
#[must_use]
pub fn parse_center_hint(hint: &str) -> Option<Coordinate> {
    let captures = CENTER_HINT_RE.captures(hint)?;
    let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Coordinate::new(latitude, longitude)
}

/// Parses a coordinate out of a maps URL. The `ll=` query parameter wins
/// over the `@lat,lng` path segment when both are present.
#[must_use]
pub fn parse_link_coordinate(link: &str) -> Option<Coordinate> {
    if let Some(captures) = LL_PARAM_RE.captures(link) {
        let latitude = captures.get(1)?.as_str().parse::<f64>().ok();
        let longitude = captures.get(2)?.as_str().parse::<f64>().ok();
        if let Some(c) = latitude.zip(longitude).and_then(|(lat, lng)| Coordinate::new(lat, lng)) {
            return Some(c);
        }
    }
    parse_center_hint(link)
}
