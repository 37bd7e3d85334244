//! Place search value types.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// How thumbnails should be delivered to the requesting client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageDelivery {
    /// Hand out the provider's thumbnail URL unchanged.
    #[default]
    Direct,
    /// Route thumbnails through the internal image proxy so the client can
    /// load them from its own origin.
    SameOrigin,
}

/// A normalized point of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub place_id: String,
    pub title: String,
    pub address: String,
    pub rating: f64,
    pub review_count: u64,
    pub thumbnail_url: Option<String>,
    /// The provider's thumbnail URL, kept even when `thumbnail_url` is proxied.
    pub original_thumbnail_url: Option<String>,
    pub category: String,
    pub coordinate: Option<Coordinate>,
}

/// One page of place search results.
///
/// `total_results_observed` is the raw record count returned for this call
/// only; the provider exposes no global total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub items: Vec<Place>,
    pub page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub total_results_observed: usize,
    pub locality: String,
}
