//! HTTP client for the `SerpAPI` search endpoint.
//!
//! Issues exactly one GET per [`SerpClient::query`] with a per-request
//! timeout chosen by [`QueryWeight`], and classifies every failure into a
//! [`GatewayError`]. The payload is returned verbatim as a
//! `serde_json::Value`; no domain field is interpreted here.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use wisata_core::{AppConfig, Coordinate};

use crate::error::GatewayError;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const ENGINE: &str = "google_maps";
const SEARCH_TYPE: &str = "search";
const LANGUAGE: &str = "id";
const COUNTRY: &str = "ID";

/// Zoom level sent with coordinate-centred queries.
pub const CENTER_ZOOM: u8 = 14;

/// Selects which configured timeout applies to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryWeight {
    /// Reverse lookups that only need the first result.
    Light,
    /// Geocoding and place searches.
    Heavy,
}

/// Injected, immutable gateway configuration.
#[derive(Clone)]
pub struct SerpConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub search_timeout: Duration,
    pub reverse_timeout: Duration,
}

impl SerpConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.serpapi_key.clone(),
            base_url: config.serpapi_base_url.clone(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            reverse_timeout: Duration::from_secs(config.reverse_timeout_secs),
        }
    }
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_timeout: Duration::from_secs(15),
            reverse_timeout: Duration::from_secs(10),
        }
    }
}

impl std::fmt::Debug for SerpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("search_timeout", &self.search_timeout)
            .field("reverse_timeout", &self.reverse_timeout)
            .finish()
    }
}

/// Parameters for one `google_maps` search.
///
/// Engine, search type and locale hints are fixed; callers choose the free
/// text, the location bias and the result window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    q: Option<String>,
    location: Option<String>,
    ll: Option<String>,
    start: Option<u32>,
    num: Option<u32>,
    weight: QueryWeight,
}

impl SearchQuery {
    /// A free-text query, e.g. an address to geocode.
    #[must_use]
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            location: None,
            ll: None,
            start: None,
            num: None,
            weight: QueryWeight::Heavy,
        }
    }

    /// A query centred on `coordinate` with no free text.
    #[must_use]
    pub fn centered(coordinate: Coordinate) -> Self {
        Self {
            q: None,
            location: None,
            ll: Some(coordinate.center_hint(CENTER_ZOOM)),
            start: None,
            num: None,
            weight: QueryWeight::Light,
        }
    }

    #[must_use]
    pub fn with_center(mut self, coordinate: Coordinate) -> Self {
        self.ll = Some(coordinate.center_hint(CENTER_ZOOM));
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Requests `num` records starting at zero-based `start`.
    #[must_use]
    pub fn with_window(mut self, start: u32, num: u32) -> Self {
        self.start = Some(start);
        self.num = Some(num);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: QueryWeight) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn weight(&self) -> QueryWeight {
        self.weight
    }

    /// Outbound query parameters, excluding the API key.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", ENGINE.to_string()),
            ("type", SEARCH_TYPE.to_string()),
        ];
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(ll) = &self.ll {
            params.push(("ll", ll.clone()));
        }
        params.push(("hl", LANGUAGE.to_string()));
        params.push(("gl", COUNTRY.to_string()));
        if let Some(start) = self.start {
            params.push(("start", start.to_string()));
        }
        if let Some(num) = self.num {
            params.push(("num", num.to_string()));
        }
        params
    }
}

/// Client for the `SerpAPI` search endpoint.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct SerpClient {
    client: Client,
    api_key: Option<String>,
    search_url: Url,
    search_timeout: Duration,
    reverse_timeout: Duration,
}

impl SerpClient {
    /// Creates a client from injected configuration.
    ///
    /// A missing API key is accepted here and reported by [`SerpClient::query`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::InvalidBaseUrl`] if
    /// `config.base_url` is not a valid URL.
    pub fn new(config: SerpConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("wisata/0.1 (location-resolution)")
            .build()
            .map_err(GatewayError::ClientBuild)?;

        let raw = format!("{}/search", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&raw).map_err(|e| GatewayError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let api_key = config
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            client,
            api_key,
            search_url,
            search_timeout: config.search_timeout,
            reverse_timeout: config.reverse_timeout,
        })
    }

    /// Issues one search and returns the provider payload verbatim.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingApiKey`] before any request if no key is set.
    /// - [`GatewayError::Timeout`] if the per-request deadline expires.
    /// - [`GatewayError::Unreachable`] if no response is received.
    /// - [`GatewayError::Auth`] on HTTP 401/403.
    /// - [`GatewayError::Upstream`] on any other non-2xx status.
    /// - [`GatewayError::EmptyResponse`] if a 2xx body is not a JSON object.
    pub async fn query(&self, query: &SearchQuery) -> Result<serde_json::Value, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;
        let timeout = self.timeout_for(query.weight());
        let params = query.params();
        let url = self.build_url(api_key, &params);

        tracing::debug!(
            engine = ENGINE,
            weight = ?query.weight(),
            timeout = ?timeout,
            params = ?params,
            "sending SerpAPI query"
        );

        let result = self.send(url, timeout).await;
        if let Err(error) = &result {
            tracing::warn!(weight = ?query.weight(), %error, "SerpAPI query failed");
        }
        result
    }

    async fn send(&self, url: Url, timeout: Duration) -> Result<serde_json::Value, GatewayError> {
        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(GatewayError::Timeout { timeout }),
            Err(e) => return Err(GatewayError::Unreachable(e)),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(GatewayError::Timeout { timeout }),
            Err(e) => {
                return Err(GatewayError::EmptyResponse {
                    reason: e.to_string(),
                })
            }
        };
        parse_payload(&body)
    }

    fn timeout_for(&self, weight: QueryWeight) -> Duration {
        match weight {
            QueryWeight::Light => self.reverse_timeout,
            QueryWeight::Heavy => self.search_timeout,
        }
    }

    /// Builds the request URL with percent-encoded query parameters and the API key.
    fn build_url(&self, api_key: &str, params: &[(&'static str, String)]) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("api_key", api_key);
        }
        url
    }
}

fn parse_payload(body: &str) -> Result<serde_json::Value, GatewayError> {
    if body.trim().is_empty() {
        return Err(GatewayError::EmptyResponse {
            reason: "response body is empty".to_string(),
        });
    }
    let payload: serde_json::Value =
        serde_json::from_str(body).map_err(|e| GatewayError::EmptyResponse {
            reason: format!("response body is not JSON: {e}"),
        })?;
    if !payload.is_object() {
        return Err(GatewayError::EmptyResponse {
            reason: "response body is not a JSON object".to_string(),
        });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SerpClient {
        SerpClient::new(SerpConfig {
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
            ..SerpConfig::default()
        })
        .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://serpapi.com");
        let query = SearchQuery::text("Bandung");
        let url = client.build_url("test-key", &query.params());
        assert_eq!(
            url.as_str(),
            "https://serpapi.com/search?engine=google_maps&type=search&q=Bandung&hl=id&gl=ID&api_key=test-key"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://serpapi.com/");
        let url = client.build_url("k", &[]);
        assert_eq!(url.as_str(), "https://serpapi.com/search?api_key=k");
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://serpapi.com");
        let query = SearchQuery::text("Jl. Merdeka & Asia Afrika");
        let url = client.build_url("k", &query.params());
        assert!(
            url.as_str().contains("Merdeka+%26+Asia"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn centered_query_is_light_and_has_center_hint() {
        let c = Coordinate::new(-6.9175, 107.6191).unwrap();
        let query = SearchQuery::centered(c);
        assert_eq!(query.weight(), QueryWeight::Light);
        let params = query.params();
        assert!(params.contains(&("ll", "@-6.9175,107.6191,14z".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "q"));
    }

    #[test]
    fn window_params_are_appended() {
        let query = SearchQuery::text("museum").with_window(9, 18);
        let params = query.params();
        assert!(params.contains(&("start", "9".to_string())));
        assert!(params.contains(&("num", "18".to_string())));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SerpClient::new(SerpConfig {
            base_url: "not a url".to_string(),
            ..SerpConfig::default()
        });
        assert!(matches!(result, Err(GatewayError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn timeout_depends_on_weight() {
        let client = SerpClient::new(SerpConfig {
            search_timeout: Duration::from_secs(15),
            reverse_timeout: Duration::from_secs(10),
            ..SerpConfig::default()
        })
        .expect("client");
        assert_eq!(client.timeout_for(QueryWeight::Heavy), Duration::from_secs(15));
        assert_eq!(client.timeout_for(QueryWeight::Light), Duration::from_secs(10));
    }

    #[test]
    fn parse_payload_rejects_empty_and_non_object_bodies() {
        assert!(matches!(
            parse_payload("   "),
            Err(GatewayError::EmptyResponse { .. })
        ));
        assert!(matches!(
            parse_payload("<html>oops</html>"),
            Err(GatewayError::EmptyResponse { .. })
        ));
        assert!(matches!(
            parse_payload("[1, 2]"),
            Err(GatewayError::EmptyResponse { .. })
        ));
        assert!(parse_payload(r#"{"search_metadata": {}}"#).is_ok());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SerpConfig {
            api_key: Some("super-secret".to_string()),
            ..SerpConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }
}
