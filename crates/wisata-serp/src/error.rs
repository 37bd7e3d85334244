use std::time::Duration;

use thiserror::Error;

/// Transport-level failures from a single `SerpAPI` call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key was configured. Raised before any request is sent.
    #[error("SerpAPI key is not configured")]
    MissingApiKey,

    #[error("invalid SerpAPI base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("SerpAPI request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// No response was received (DNS, connect, TLS or reset).
    #[error("SerpAPI unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("SerpAPI rejected the API key (HTTP {status})")]
    Auth { status: u16 },

    #[error("SerpAPI returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// 2xx response whose body is missing or is not a JSON object.
    #[error("SerpAPI returned an empty or unreadable body: {reason}")]
    EmptyResponse { reason: String },
}

/// Failures surfaced by the address resolver and place search.
///
/// Gateway failures pass through unchanged. A query that executed but found
/// nothing is not an error; see [`wisata_core::GeocodeStatus::ZeroResults`].
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Caller supplied a blank address, bad coordinate or bad page window.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// 2xx JSON payload that lacks the provider's query-echo fields entirely.
    #[error("malformed SerpAPI response: {0}")]
    MalformedUpstreamResponse(String),
}
