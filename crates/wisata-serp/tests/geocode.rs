//! Integration tests for `AddressResolver` against wiremock fixtures.
//!
//! Each cascade fixture populates exactly one payload location alongside the
//! usual query echo, so the resolved coordinate identifies the branch taken.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wisata_core::{CoordinateSource, Gazetteer, GeocodeStatus};
use wisata_serp::{AddressResolver, GatewayError, ResolverError, SerpClient, SerpConfig};

fn resolver(base_url: &str) -> AddressResolver {
    let client = SerpClient::new(SerpConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        search_timeout: Duration::from_millis(500),
        reverse_timeout: Duration::from_millis(500),
    })
    .expect("client construction should not fail");
    AddressResolver::new(Arc::new(client), Arc::new(Gazetteer::builtin()))
}

fn with_echo(mut branch: Value) -> Value {
    let object = branch.as_object_mut().expect("fixture is an object");
    object.insert(
        "search_metadata".to_string(),
        json!({"id": "abc", "status": "Success"}),
    );
    object
        .entry("search_parameters".to_string())
        .or_insert_with(|| json!({"engine": "google_maps", "q": "fixture"}));
    branch
}

async fn mount_payload(server: &MockServer, body: &Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn resolve_fixture(body: Value) -> wisata_core::GeocodeResult {
    let server = MockServer::start().await;
    mount_payload(&server, &body).await;
    resolver(&server.uri())
        .resolve("fixture")
        .await
        .expect("fixture should resolve")
}

fn assert_resolved_to(
    result: &wisata_core::GeocodeResult,
    source: CoordinateSource,
    lat: f64,
    lng: f64,
) {
    assert_eq!(result.status, GeocodeStatus::Ok);
    assert_eq!(result.source, Some(source));
    let c = result.coordinate.expect("coordinate present when OK");
    assert!(
        (c.latitude() - lat).abs() < 1e-9 && (c.longitude() - lng).abs() < 1e-9,
        "expected {lat},{lng}, got {c}"
    );
}

#[tokio::test]
async fn branch_1_location_list() {
    let body = with_echo(json!({
        "locations": [{"title": "Gedung Sate", "latitude": -6.9025, "longitude": 107.6188}]
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::LocationList, -6.9025, 107.6188);
}

#[tokio::test]
async fn branch_2_center_hint() {
    let body = with_echo(json!({
        "search_parameters": {"engine": "google_maps", "q": "fixture", "ll": "@-6.2088,106.8456,12z"}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::CenterHint, -6.2088, 106.8456);
    assert_eq!(result.formatted_address, "fixture");
}

#[tokio::test]
async fn branch_3_local_results() {
    let body = with_echo(json!({
        "local_results": [{"title": "Tugu Jogja", "gps_coordinates": {"latitude": -7.7829, "longitude": 110.3671}}]
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::LocalResults, -7.7829, 110.3671);
    assert_eq!(result.formatted_address, "Tugu Jogja");
}

#[tokio::test]
async fn branch_4_maps_results() {
    let body = with_echo(json!({
        "maps_results": [{"gps_coordinates": {"latitude": -7.2575, "longitude": 112.7521}}]
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::MapsResults, -7.2575, 112.7521);
}

#[tokio::test]
async fn branch_5_knowledge_graph() {
    let body = with_echo(json!({
        "knowledge_graph": {"title": "Candi Borobudur", "gps_coordinates": {"latitude": -7.6079, "longitude": 110.2038}}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::KnowledgeGraph, -7.6079, 110.2038);
}

#[tokio::test]
async fn branch_6_place_result() {
    let body = with_echo(json!({
        "place_results": {"title": "Kawah Putih", "data": {"latitude": "-7.1662", "longitude": "107.4021"}}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::PlaceResult, -7.1662, 107.4021);
}

#[tokio::test]
async fn branch_6_place_result_gps_coordinates() {
    let body = with_echo(json!({
        "place_results": {"title": "Tangkuban Perahu", "gps_coordinates": {"latitude": -6.7597, "longitude": 107.6098}}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::PlaceResult, -6.7597, 107.6098);
    assert_eq!(result.formatted_address, "Tangkuban Perahu");
}

#[tokio::test]
async fn branch_7_search_information() {
    let body = with_echo(json!({
        "search_information": {"location": {"coordinates": {"latitude": -8.6705, "longitude": 115.2126}}}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::SearchInformation, -8.6705, 115.2126);
}

#[tokio::test]
async fn branch_8_place_link() {
    let body = with_echo(json!({
        "place_results": {"link": "https://www.google.com/maps/place/Monas/@-6.1754,106.8272,17z"}
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::PlaceLink, -6.1754, 106.8272);
}

#[tokio::test]
async fn center_hint_outranks_maps_results() {
    let body = with_echo(json!({
        "search_parameters": {"q": "fixture", "ll": "@-6.9175,107.6191,14z"},
        "maps_results": [{"gps_coordinates": {"latitude": -7.2575, "longitude": 112.7521}}]
    }));
    let result = resolve_fixture(body).await;
    assert_resolved_to(&result, CoordinateSource::CenterHint, -6.9175, 107.6191);
}

#[tokio::test]
async fn blank_address_is_invalid_input_without_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver(&server.uri());
    for address in ["", "   "] {
        let err = resolver.resolve(address).await.unwrap_err();
        assert!(matches!(err, ResolverError::InvalidInput(_)), "got: {err:?}");
    }
}

#[tokio::test]
async fn bandung_falls_back_to_gazetteer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "Bandung"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_metadata": {"status": "Success"},
            "search_parameters": {"engine": "google_maps", "q": "Bandung"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = resolver(&server.uri())
        .resolve("Bandung")
        .await
        .expect("gazetteer hit");

    let expected = Gazetteer::builtin().lookup("bandung").expect("builtin");
    assert_eq!(result.status, GeocodeStatus::Ok);
    assert_eq!(result.source, Some(CoordinateSource::Gazetteer));
    assert_eq!(result.coordinate, Some(expected));
}

#[tokio::test]
async fn unknown_place_is_zero_results() {
    let server = MockServer::start().await;
    mount_payload(
        &server,
        &json!({
            "search_metadata": {"status": "Success"},
            "search_parameters": {"engine": "google_maps", "q": "Nowhere"}
        }),
    )
    .await;

    let result = resolver(&server.uri())
        .resolve("Nowhere")
        .await
        .expect("zero results is not an error");
    assert_eq!(result.status, GeocodeStatus::ZeroResults);
    assert!(result.coordinate.is_none());
}

#[tokio::test]
async fn payload_without_echo_is_malformed() {
    let server = MockServer::start().await;
    mount_payload(&server, &json!({"local_results": []})).await;

    let err = resolver(&server.uri()).resolve("Bandung").await.unwrap_err();
    assert!(
        matches!(err, ResolverError::MalformedUpstreamResponse(_)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn timeout_surfaces_once_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = resolver(&server.uri()).resolve("Bandung").await.unwrap_err();
    assert!(
        matches!(err, ResolverError::Gateway(GatewayError::Timeout { .. })),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn auth_failure_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = resolver(&server.uri()).resolve("Bandung").await.unwrap_err();
    assert!(matches!(
        err,
        ResolverError::Gateway(GatewayError::Auth { status: 401 })
    ));
}
