//! Static locality → coordinate lookup used when the provider executes a
//! query but returns no usable coordinate.
//!
//! The table is built once at startup from a built-in list, optionally
//! extended by a YAML file, and never mutated afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::ConfigError;

/// Built-in entries: `(name, latitude, longitude)`.
const BUILTIN_LOCALITIES: &[(&str, f64, f64)] = &[
    ("jakarta", -6.2088, 106.8456),
    ("bandung", -6.9175, 107.6191),
    ("surabaya", -7.2575, 112.7521),
    ("yogyakarta", -7.7956, 110.3695),
    ("jogja", -7.7956, 110.3695),
    ("bali", -8.3405, 115.0920),
    ("denpasar", -8.6705, 115.2126),
    ("medan", 3.5952, 98.6722),
    ("semarang", -6.9667, 110.4167),
    ("malang", -7.9666, 112.6326),
    ("makassar", -5.1477, 119.4327),
    ("bogor", -6.5971, 106.8060),
    ("solo", -7.5755, 110.8243),
    ("lombok", -8.6500, 116.3249),
    ("labuan bajo", -8.4964, 119.8877),
    ("palembang", -2.9761, 104.7754),
    ("padang", -0.9471, 100.4172),
    ("manado", 1.4748, 124.8421),
    ("batam", 1.0456, 104.0305),
    ("balikpapan", -1.2379, 116.8529),
    ("pontianak", -0.0263, 109.3425),
];

/// Normalizes a locality name for lookup: trimmed and lowercased.
#[must_use]
pub fn normalize_locality(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GazetteerFile {
    gazetteer: Vec<GazetteerEntry>,
}

/// Immutable map from normalized locality name to canonical coordinate.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: HashMap<String, Coordinate>,
}

impl Gazetteer {
    /// The built-in table of common Indonesian localities.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_LOCALITIES
            .iter()
            .filter_map(|&(name, lat, lng)| {
                Coordinate::new(lat, lng).map(|c| (normalize_locality(name), c))
            })
            .collect();
        Self { entries }
    }

    /// An empty table. Every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a table from explicit entries, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for blank names, out-of-range
    /// coordinates, or two entries that normalize to the same name.
    pub fn from_entries(entries: &[GazetteerEntry]) -> Result<Self, ConfigError> {
        let mut gazetteer = Self::empty();
        gazetteer.extend_validated(entries)?;
        Ok(gazetteer)
    }

    fn extend_validated(&mut self, entries: &[GazetteerEntry]) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in entries {
            let key = normalize_locality(&entry.name);
            if key.is_empty() {
                return Err(ConfigError::Validation(
                    "gazetteer entry name must be non-empty".to_string(),
                ));
            }
            let coordinate = Coordinate::new(entry.latitude, entry.longitude).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "gazetteer entry '{}' has invalid coordinate {}, {}",
                    entry.name, entry.latitude, entry.longitude
                ))
            })?;
            if !seen.insert(key.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate gazetteer entry: '{}'",
                    entry.name
                )));
            }
            self.entries.insert(key, coordinate);
        }
        Ok(())
    }

    /// Looks up a locality by name. The name is normalized first; no fuzzy
    /// matching is attempted.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Coordinate> {
        self.entries.get(&normalize_locality(name)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load the built-in gazetteer, extended by the YAML file at `path` if given.
///
/// File entries override built-in entries with the same normalized name.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_gazetteer(path: Option<&Path>) -> Result<Gazetteer, ConfigError> {
    let mut gazetteer = Gazetteer::builtin();
    let Some(path) = path else {
        return Ok(gazetteer);
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::GazetteerFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: GazetteerFile =
        serde_yaml::from_str(&content).map_err(ConfigError::GazetteerFileParse)?;

    gazetteer.extend_validated(&file.gazetteer)?;
    Ok(gazetteer)
}
