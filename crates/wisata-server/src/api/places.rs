use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use wisata_core::{ImageDelivery, SearchPage};
use wisata_serp::PlaceSearchRequest;

use crate::middleware::RequestId;

use super::{map_resolver_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PlacesQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub query: Option<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub proxy_images: Option<bool>,
}

impl PlacesQuery {
    fn into_request(self) -> Option<PlaceSearchRequest> {
        let mut request = PlaceSearchRequest::new(self.lat?, self.lon?);
        request.query = self.query;
        request.locality = self.location;
        if let Some(page) = self.page {
            request.page = page;
        }
        if let Some(page_size) = self.page_size {
            request.page_size = page_size;
        }
        if self.proxy_images.unwrap_or(false) {
            request.image_delivery = ImageDelivery::SameOrigin;
        }
        Some(request)
    }
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<ApiResponse<SearchPage>>, ApiError> {
    let request = query.into_request().ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "validation_error", "lat and lon are required")
    })?;

    let data = state
        .service
        .search_places(&request)
        .await
        .map_err(|e| map_resolver_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
