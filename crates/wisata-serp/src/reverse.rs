//! Best-effort reverse lookup: coordinate → locality name.
//!
//! The result only biases a following place search, so every failure path
//! degrades to [`DEFAULT_LOCALITY`] instead of propagating.

use std::sync::Arc;

use serde_json::Value;
use wisata_core::Coordinate;

use crate::client::{SearchQuery, SerpClient};
use crate::error::ResolverError;
use crate::payload::{first, str_at};

/// Locality used whenever nothing better can be extracted.
pub const DEFAULT_LOCALITY: &str = "Indonesia";

#[derive(Clone)]
pub struct LocalityResolver {
    client: Arc<SerpClient>,
}

impl LocalityResolver {
    #[must_use]
    pub fn new(client: Arc<SerpClient>) -> Self {
        Self { client }
    }

    /// Returns a human-readable locality near `(latitude, longitude)`.
    ///
    /// Never fails: invalid coordinates, gateway errors and empty payloads all
    /// yield [`DEFAULT_LOCALITY`].
    pub async fn resolve_locality(&self, latitude: f64, longitude: f64) -> String {
        match self.try_resolve(latitude, longitude).await {
            Ok(Some(locality)) => {
                tracing::debug!(latitude, longitude, locality = %locality, "reverse lookup succeeded");
                locality
            }
            Ok(None) => {
                tracing::warn!(
                    latitude,
                    longitude,
                    "reverse lookup found no locality; using default"
                );
                DEFAULT_LOCALITY.to_string()
            }
            Err(error) => {
                tracing::warn!(
                    latitude,
                    longitude,
                    %error,
                    "reverse lookup failed; using default"
                );
                DEFAULT_LOCALITY.to_string()
            }
        }
    }

    async fn try_resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, ResolverError> {
        let coordinate = Coordinate::new(latitude, longitude).ok_or_else(|| {
            ResolverError::InvalidInput(format!(
                "coordinate out of range: {latitude}, {longitude}"
            ))
        })?;
        let payload = self.client.query(&SearchQuery::centered(coordinate)).await?;
        Ok(extract_locality(&payload))
    }
}

/// Pulls a locality out of a coordinate-centred search payload.
///
/// With at least one local result, only the first result's address counts:
/// the second comma segment when there are at least two (usually the city),
/// otherwise the only one, and `None` when it has no usable address. With no
/// local results at all, falls back to the echoed `search_parameters.q`.
#[must_use]
pub fn extract_locality(payload: &Value) -> Option<String> {
    match first(payload, &["local_results"]) {
        Some(record) => str_at(record, &["address"]).and_then(locality_from_address),
        None => str_at(payload, &["search_parameters", "q"]).map(str::to_string),
    }
}

fn locality_from_address(address: &str) -> Option<String> {
    let segments: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    match segments.as_slice() {
        [] => None,
        [only] => Some((*only).to_string()),
        [_, second, ..] => Some((*second).to_string()),
    }
}
