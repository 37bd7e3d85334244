//! Forward geocoding: address → coordinate.

pub mod cascade;

use std::sync::Arc;

use serde_json::Value;
use wisata_core::{CoordinateSource, Gazetteer, GeocodeResult};

use crate::client::{QueryWeight, SearchQuery, SerpClient};
use crate::error::ResolverError;
use crate::payload::{path, str_at};

use cascade::run_cascade;

/// Resolves free-text addresses to coordinates.
///
/// Issues one gateway call per address, runs the extraction cascade over the
/// payload and falls back to the [`Gazetteer`] when the provider executed the
/// query but returned nothing usable.
#[derive(Clone)]
pub struct AddressResolver {
    client: Arc<SerpClient>,
    gazetteer: Arc<Gazetteer>,
}

impl AddressResolver {
    #[must_use]
    pub fn new(client: Arc<SerpClient>, gazetteer: Arc<Gazetteer>) -> Self {
        Self { client, gazetteer }
    }

    /// Resolves `address` to a [`GeocodeResult`].
    ///
    /// `ZERO_RESULTS` is returned as `Ok`; only transport failures, blank
    /// input and payloads missing the query echo are errors.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::InvalidInput`] if `address` is blank. No request is sent.
    /// - [`ResolverError::Gateway`] for any transport failure, unchanged.
    /// - [`ResolverError::MalformedUpstreamResponse`] if the payload carries
    ///   neither `search_metadata` nor `search_parameters`.
    pub async fn resolve(&self, address: &str) -> Result<GeocodeResult, ResolverError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ResolverError::InvalidInput(
                "address must not be empty".to_string(),
            ));
        }

        let query = SearchQuery::text(address).with_weight(QueryWeight::Heavy);
        let payload = self.client.query(&query).await?;
        interpret(address, &payload, &self.gazetteer)
    }
}

/// Whether the provider echoed the query back at all.
fn has_query_echo(payload: &Value) -> bool {
    path(payload, &["search_metadata"]).is_some_and(Value::is_object)
        || path(payload, &["search_parameters"]).is_some_and(Value::is_object)
}

/// Whether the provider reports that the query ran to completion.
///
/// `search_metadata.status == "Success"`, or no status at all while the
/// search parameters were echoed.
fn query_executed(payload: &Value) -> bool {
    match str_at(payload, &["search_metadata", "status"]) {
        Some(status) => status.eq_ignore_ascii_case("success"),
        None => path(payload, &["search_parameters"]).is_some_and(Value::is_object),
    }
}

/// Applies the cascade, the gazetteer fallback and the zero-results rule to
/// an already fetched payload.
fn interpret(
    address: &str,
    payload: &Value,
    gazetteer: &Gazetteer,
) -> Result<GeocodeResult, ResolverError> {
    if let Some((source, hit)) = run_cascade(payload) {
        tracing::debug!(address, %source, coordinate = %hit.coordinate, "geocoded address");
        let formatted = hit.label.unwrap_or_else(|| address.to_string());
        return Ok(GeocodeResult::resolved(formatted, hit.coordinate, source));
    }

    if !has_query_echo(payload) {
        return Err(ResolverError::MalformedUpstreamResponse(
            "payload has neither search_metadata nor search_parameters".to_string(),
        ));
    }

    if query_executed(payload) {
        if let Some(coordinate) = gazetteer.lookup(address) {
            tracing::info!(address, %coordinate, "geocoded address from gazetteer fallback");
            return Ok(GeocodeResult::resolved(
                address,
                coordinate,
                CoordinateSource::Gazetteer,
            ));
        }
    } else {
        tracing::warn!(
            address,
            status = str_at(payload, &["search_metadata", "status"]),
            error = str_at(payload, &["error"]),
            "SerpAPI did not report a successful search"
        );
    }

    tracing::info!(address, "no coordinate found for address");
    Ok(GeocodeResult::zero_results(address))
}
