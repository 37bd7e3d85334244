//! Place search around a coordinate with pagination and thumbnail handling.

pub mod normalize;
pub mod pagination;
pub mod thumbnail;

use std::sync::Arc;

use wisata_core::{Coordinate, ImageDelivery, SearchPage};

use crate::client::{QueryWeight, SearchQuery, SerpClient};
use crate::error::ResolverError;
use crate::payload::path;
use crate::reverse::LocalityResolver;

use normalize::normalize_places;
use pagination::PageWindow;
use thumbnail::apply_image_delivery;

/// Query used when the caller supplies no search text.
pub const DEFAULT_QUERY: &str = "tempat wisata";

/// Inputs for one place search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub query: Option<String>,
    /// Locality bias. Resolved from the coordinate when absent or blank.
    pub locality: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub image_delivery: ImageDelivery,
}

impl PlaceSearchRequest {
    /// First page of 20 with no query, locality or proxying.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            query: None,
            locality: None,
            page: 1,
            page_size: 20,
            image_delivery: ImageDelivery::Direct,
        }
    }
}

#[derive(Clone)]
pub struct PlaceSearch {
    client: Arc<SerpClient>,
    localities: LocalityResolver,
    image_proxy_base: String,
}

impl PlaceSearch {
    #[must_use]
    pub fn new(client: Arc<SerpClient>, image_proxy_base: impl Into<String>) -> Self {
        let localities = LocalityResolver::new(Arc::clone(&client));
        Self {
            client,
            localities,
            image_proxy_base: image_proxy_base.into(),
        }
    }

    /// Searches for places near the request coordinate and returns one page.
    ///
    /// An empty provider result is an empty page, not an error.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::InvalidInput`] for an out-of-range coordinate or an
    ///   invalid page window. No request is sent.
    /// - [`ResolverError::Gateway`] if the search call fails. Reverse lookup
    ///   failures never surface here.
    pub async fn search(&self, request: &PlaceSearchRequest) -> Result<SearchPage, ResolverError> {
        let coordinate = Coordinate::new(request.latitude, request.longitude).ok_or_else(|| {
            ResolverError::InvalidInput(format!(
                "coordinate out of range: {}, {}",
                request.latitude, request.longitude
            ))
        })?;
        let window = PageWindow::new(request.page, request.page_size)?;

        let locality = match request
            .locality
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            Some(locality) => locality.to_string(),
            None => {
                self.localities
                    .resolve_locality(coordinate.latitude(), coordinate.longitude())
                    .await
            }
        };

        let text = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUERY);

        let query = SearchQuery::text(text)
            .with_location(locality.clone())
            .with_center(coordinate)
            .with_window(window.offset(), window.fetch_count())
            .with_weight(QueryWeight::Heavy);

        let payload = self.client.query(&query).await?;

        let records = path(&payload, &["local_results"])
            .and_then(serde_json::Value::as_array)
            .map_or(&[][..], Vec::as_slice);
        let raw_count = records.len();

        let mut places = normalize_places(records);
        apply_image_delivery(&mut places, request.image_delivery, &self.image_proxy_base);

        tracing::info!(
            query = text,
            locality = %locality,
            page = window.page(),
            page_size = window.page_size(),
            raw_count,
            "place search completed"
        );

        Ok(window.assemble(places, raw_count, locality))
    }
}
