//! Normalization of raw `local_results` records into [`Place`] values.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use wisata_core::Place;

use crate::payload::{gps_coordinates, loose_f64, str_at};

pub const DEFAULT_TITLE: &str = "Unnamed Location";
pub const DEFAULT_ADDRESS: &str = "No address available";
pub const DEFAULT_CATEGORY: &str = "Tourist Attraction";

/// `1234`, `1,234`, `1.234.567`: digits with optional three-digit grouping.
static GROUPED_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+|\d{1,3}(?:\.\d{3})+)$").expect("valid regex")
});

/// `1.2K`, `1,2 rb`, `3 jt`: a short mantissa with a magnitude suffix.
static ABBREVIATED_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*(k|rb|ribu|m|jt|juta)\.?$").expect("valid regex")
});

/// Opaque id for records the provider sent without a `place_id`.
fn generated_place_id() -> String {
    format!("place-{}", uuid::Uuid::new_v4().simple())
}

/// Normalizes one raw record. Returns `None` for non-object entries.
#[must_use]
pub fn normalize_place(record: &Value) -> Option<Place> {
    if !record.is_object() {
        return None;
    }

    let rating = record
        .get("rating")
        .and_then(loose_f64)
        .filter(|r| *r >= 0.0)
        .unwrap_or(0.0);

    let review_count = record.get("reviews").and_then(review_count).unwrap_or(0);

    let thumbnail = str_at(record, &["thumbnail"]).map(str::to_string);

    Some(Place {
        place_id: str_at(record, &["place_id"])
            .map_or_else(generated_place_id, str::to_string),
        title: str_at(record, &["title"]).unwrap_or(DEFAULT_TITLE).to_string(),
        address: str_at(record, &["address"])
            .unwrap_or(DEFAULT_ADDRESS)
            .to_string(),
        rating,
        review_count,
        thumbnail_url: thumbnail.clone(),
        original_thumbnail_url: thumbnail,
        category: str_at(record, &["category"])
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        coordinate: gps_coordinates(record),
    })
}

/// Review counts arrive as integers, floats, grouped strings like `"1,234"`,
/// or abbreviated strings like `"1.2K"` / `"1,2 rb"`. Anything else is `None`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn review_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => parse_review_text(s.trim()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_review_text(text: &str) -> Option<u64> {
    if GROUPED_COUNT_RE.is_match(text) {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        return digits.parse::<u64>().ok();
    }

    let caps = ABBREVIATED_COUNT_RE.captures(text)?;
    let mantissa: f64 = caps[1].replace(',', ".").parse().ok()?;
    let multiplier = match caps[2].to_ascii_lowercase().as_str() {
        "k" | "rb" | "ribu" => 1_000.0,
        "m" | "jt" | "juta" => 1_000_000.0,
        _ => return None,
    };
    let count = (mantissa * multiplier).round();
    (count.is_finite() && count < 1e15).then_some(count as u64)
}

/// Normalizes every record, keeping the first occurrence of each `place_id`.
#[must_use]
pub fn normalize_places(records: &[Value]) -> Vec<Place> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(normalize_place)
        .filter(|place| seen.insert(place.place_id.clone()))
        .collect()
}
