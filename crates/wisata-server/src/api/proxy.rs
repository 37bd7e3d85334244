use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use thiserror::Error;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
const CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Deserialize)]
pub(super) struct ProxyQuery {
    pub url: Option<String>,
}

/// Relays a provider thumbnail so browsers can load it from this origin.
pub(super) async fn proxy_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let raw = query.url.unwrap_or_default();
    let url = allowed_image_url(&raw, &state.image_hosts).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "url is not an allowed image source",
        )
    })?;

    let response = state.images.get(url).send().await.map_err(|e| {
        tracing::warn!(error = %e, url = %raw, "image fetch failed");
        let code = if e.is_timeout() {
            "upstream_timeout"
        } else {
            "upstream_unreachable"
        };
        ApiError::new(req_id.0.clone(), code, "image could not be fetched")
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), url = %raw, "image source returned error");
        return Err(ApiError::new(
            req_id.0,
            "upstream_error",
            format!("image source returned HTTP {}", status.as_u16()),
        ));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let bytes = read_limited(response, state.max_image_bytes)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, url = %raw, "image body rejected");
            let code = match &e {
                ImageReadError::TooLarge { .. } => "image_too_large",
                ImageReadError::Read(_) => "upstream_error",
            };
            ApiError::new(req_id.0.clone(), code, e.to_string())
        })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
        ],
        Body::from(bytes),
    )
        .into_response())
}

#[derive(Debug, Error)]
enum ImageReadError {
    #[error("image exceeds the {limit}-byte proxy limit")]
    TooLarge { limit: usize },

    #[error("image could not be read")]
    Read(#[source] reqwest::Error),
}

/// Reads the body chunk by chunk, refusing anything over `limit` bytes.
///
/// A declared `Content-Length` over the limit is rejected before any body
/// bytes are read.
async fn read_limited(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ImageReadError> {
    let declared = match response.content_length().map(usize::try_from) {
        Some(Ok(len)) if len <= limit => len,
        Some(_) => return Err(ImageReadError::TooLarge { limit }),
        None => 0,
    };

    let mut buf = Vec::with_capacity(declared);
    while let Some(chunk) = response.chunk().await.map_err(ImageReadError::Read)? {
        if buf.len() + chunk.len() > limit {
            return Err(ImageReadError::TooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Parses `raw` and accepts it only for http(s) URLs on an allowed host or
/// one of its subdomains.
fn allowed_image_url(raw: &str, hosts: &[String]) -> Option<reqwest::Url> {
    let url = reqwest::Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    let allowed = hosts.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    });
    allowed.then_some(url)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::tests::test_state;
    use super::super::{build_app, DEFAULT_IMAGE_HOSTS};
    use super::*;

    fn default_hosts() -> Vec<String> {
        DEFAULT_IMAGE_HOSTS.iter().map(|h| (*h).to_string()).collect()
    }

    #[test]
    fn provider_hosts_and_subdomains_are_allowed() {
        let hosts = default_hosts();
        assert!(allowed_image_url("https://serpapi.com/searches/a.jpeg", &hosts).is_some());
        assert!(allowed_image_url("https://lh5.googleusercontent.com/p/x", &hosts).is_some());
        assert!(allowed_image_url("https://LH3.GoogleUserContent.com/p/x", &hosts).is_some());
    }

    #[test]
    fn foreign_or_lookalike_hosts_are_rejected() {
        let hosts = default_hosts();
        for url in [
            "https://example.com/a.jpg",
            "https://evilserpapi.com/a.jpg",
            "https://serpapi.com.evil.net/a.jpg",
            "ftp://serpapi.com/a.jpg",
            "not a url",
            "",
        ] {
            assert!(allowed_image_url(url, &hosts).is_none(), "{url} should be rejected");
        }
    }

    #[tokio::test]
    async fn disallowed_host_is_bad_request() {
        let app = build_app(test_state("http://127.0.0.1:9"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/proxy-image?url=https%3A%2F%2Fexample.com%2Fa.jpg")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn relays_bytes_with_cache_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/thumb.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut state = test_state("http://127.0.0.1:9");
        state.image_hosts = Arc::from(vec!["127.0.0.1".to_string()]);
        let app = build_app(state);

        let target = format!("{}/p/thumb.png", server.uri());
        let uri = format!(
            "/api/v1/proxy-image?url={}",
            target.replace(':', "%3A").replace('/', "%2F")
        );
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/huge.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = test_state("http://127.0.0.1:9");
        state.image_hosts = Arc::from(vec!["127.0.0.1".to_string()]);
        state.max_image_bytes = 16;
        let app = build_app(state);

        let target = format!("{}/p/huge.jpg", server.uri());
        let uri = format!(
            "/api/v1/proxy-image?url={}",
            target.replace(':', "%3A").replace('/', "%2F")
        );
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"], "image_too_large");
    }

    #[tokio::test]
    async fn upstream_image_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = test_state("http://127.0.0.1:9");
        state.image_hosts = Arc::from(vec!["127.0.0.1".to_string()]);
        let app = build_app(state);

        let target = format!("{}/missing.jpg", server.uri());
        let uri = format!(
            "/api/v1/proxy-image?url={}",
            target.replace(':', "%3A").replace('/', "%2F")
        );
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
