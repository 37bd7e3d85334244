//! Lookup command handlers for the CLI.
//!
//! Each handler runs one `LocationService` operation and prints the result
//! as pretty JSON on stdout. Logs go to stderr so output stays pipeable.

use serde_json::json;
use wisata_core::ImageDelivery;
use wisata_serp::{LocationService, PlaceSearchRequest};

/// Resolve `address` and print the `GeocodeResult`.
///
/// # Errors
///
/// Returns an error if the address is blank or the provider call fails.
/// `ZERO_RESULTS` is printed, not returned as an error.
pub(crate) async fn run_geocode(service: &LocationService, address: &str) -> anyhow::Result<()> {
    let result = service.resolve_address(address).await?;
    if !result.is_ok() {
        tracing::info!(address, "no coordinate found");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Resolve a coordinate to a locality and print `{"locality": ...}`.
///
/// # Errors
///
/// Only fails if stdout serialization fails; provider errors degrade to the
/// default locality.
pub(crate) async fn run_locality(
    service: &LocationService,
    latitude: f64,
    longitude: f64,
) -> anyhow::Result<()> {
    let locality = service.resolve_locality(latitude, longitude).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "locality": locality }))?
    );
    Ok(())
}

pub(crate) fn places_request(
    latitude: f64,
    longitude: f64,
    query: Option<String>,
    location: Option<String>,
    page: u32,
    page_size: u32,
    proxy_images: bool,
) -> PlaceSearchRequest {
    PlaceSearchRequest {
        latitude,
        longitude,
        query,
        locality: location,
        page,
        page_size,
        image_delivery: if proxy_images {
            ImageDelivery::SameOrigin
        } else {
            ImageDelivery::Direct
        },
    }
}

/// Run one place search and print the `SearchPage`.
///
/// # Errors
///
/// Returns an error for an invalid coordinate or page window, or if the
/// provider search call fails.
pub(crate) async fn run_places(
    service: &LocationService,
    request: &PlaceSearchRequest,
) -> anyhow::Result<()> {
    let page = service.search_places(request).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
