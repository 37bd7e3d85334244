use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use wisata_core::GeocodeResult;

use crate::middleware::RequestId;

use super::{map_resolver_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocalityQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct LocalityData {
    pub locality: String,
}

/// `ZERO_RESULTS` is a successful response; only failures map to errors.
pub(super) async fn geocode_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodeResult>>, ApiError> {
    let address = query.address.unwrap_or_default();
    let data = state
        .service
        .resolve_address(&address)
        .await
        .map_err(|e| map_resolver_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn resolve_locality(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocalityQuery>,
) -> Result<Json<ApiResponse<LocalityData>>, ApiError> {
    let (Some(lat), Some(lon)) = (query.lat, query.lon) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "lat and lon are required",
        ));
    };

    let locality = state.service.resolve_locality(lat, lon).await;
    Ok(Json(ApiResponse {
        data: LocalityData { locality },
        meta: ResponseMeta::new(req_id.0),
    }))
}
