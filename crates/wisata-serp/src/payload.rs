//! Non-panicking lookups into loosely-typed provider payloads.
//!
//! `SerpAPI` moves fields between nesting levels and switches between
//! numbers and numeric strings. Every helper here returns `None` instead of
//! failing when a segment is missing or has the wrong shape.

use serde_json::Value;
use wisata_core::Coordinate;

/// Follows `segments` through nested objects. A segment that parses as an
/// integer indexes into an array.
#[must_use]
pub fn path<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns a trimmed, non-empty string at `segments`.
#[must_use]
pub fn str_at<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a str> {
    path(value, segments)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Returns the first element of the array at `segments`.
#[must_use]
pub fn first<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    path(value, segments)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
}

/// Reads a number that the provider may encode as a JSON number or a
/// numeric string.
#[must_use]
pub fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Reads `lat_key`/`lng_key` from an object as a validated coordinate.
#[must_use]
pub fn coordinate_fields(record: &Value, lat_key: &str, lng_key: &str) -> Option<Coordinate> {
    let latitude = record.get(lat_key).and_then(loose_f64)?;
    let longitude = record.get(lng_key).and_then(loose_f64)?;
    Coordinate::new(latitude, longitude)
}

/// Reads a record's nested `gps_coordinates: {latitude, longitude}` pair.
#[must_use]
pub fn gps_coordinates(record: &Value) -> Option<Coordinate> {
    record
        .get("gps_coordinates")
        .and_then(|gps| coordinate_fields(gps, "latitude", "longitude"))
}
