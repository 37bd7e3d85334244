mod geocode;
mod places;
mod proxy;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use wisata_serp::{GatewayError, LocationService, ResolverError};

use crate::middleware::{request_id, RequestId};

/// Hosts (and their subdomains) the image proxy will fetch from.
pub const DEFAULT_IMAGE_HOSTS: &[&str] = &["serpapi.com", "googleusercontent.com"];

/// Largest upstream image the proxy will relay.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub service: LocationService,
    pub images: reqwest::Client,
    pub image_hosts: Arc<[String]>,
    pub max_image_bytes: usize,
}

impl AppState {
    /// Wraps a service with an image client restricted to the provider hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if the image `reqwest::Client` cannot be built.
    pub fn new(service: LocationService) -> Result<Self, reqwest::Error> {
        let images = reqwest::Client::builder()
            .timeout(IMAGE_FETCH_TIMEOUT)
            .user_agent(concat!("wisata-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            service,
            images,
            image_hosts: DEFAULT_IMAGE_HOSTS
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_timeout" => StatusCode::GATEWAY_TIMEOUT,
            "upstream_unreachable" | "upstream_auth" | "upstream_error" | "upstream_empty"
            | "upstream_malformed" | "image_too_large" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a resolver failure onto the API error envelope.
///
/// Upstream bodies and key problems are logged, never echoed to the caller.
pub(super) fn map_resolver_error(request_id: String, error: &ResolverError) -> ApiError {
    let (code, message) = match error {
        ResolverError::InvalidInput(reason) => ("validation_error", reason.clone()),
        ResolverError::MalformedUpstreamResponse(_) => (
            "upstream_malformed",
            "location provider returned an unrecognised payload".to_string(),
        ),
        ResolverError::Gateway(gateway) => match gateway {
            GatewayError::MissingApiKey | GatewayError::InvalidBaseUrl { .. } => (
                "config_error",
                "location provider is not configured".to_string(),
            ),
            GatewayError::ClientBuild(_) => (
                "internal_error",
                "location provider client unavailable".to_string(),
            ),
            GatewayError::Timeout { .. } => (
                "upstream_timeout",
                "location provider timed out".to_string(),
            ),
            GatewayError::Unreachable(_) => (
                "upstream_unreachable",
                "location provider is unreachable".to_string(),
            ),
            GatewayError::Auth { .. } => (
                "upstream_auth",
                "location provider rejected credentials".to_string(),
            ),
            GatewayError::Upstream { status, .. } => (
                "upstream_error",
                format!("location provider returned HTTP {status}"),
            ),
            GatewayError::EmptyResponse { .. } => (
                "upstream_empty",
                "location provider returned an empty response".to_string(),
            ),
        },
    };

    if matches!(error, ResolverError::InvalidInput(_)) {
        tracing::debug!(error = %error, "rejected request input");
    } else {
        tracing::error!(error = %error, code, "location request failed");
    }
    ApiError::new(request_id, code, message)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/geocode", get(geocode::geocode_address))
        .route("/api/v1/locality", get(geocode::resolve_locality))
        .route("/api/v1/places", get(places::search_places))
        .route("/api/v1/proxy-image", get(proxy::proxy_image))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}
