use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use motoria_core::UserLocation;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ResolveQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ResolvedLocationData {
    query: String,
    #[serde(flatten)]
    location: UserLocation,
}

/// `GET /api/v1/locations/resolve?q=` — resolve free-text into a canonical
/// Spanish geography.
///
/// The static city/province dictionaries are tried first; only unrecognised
/// text reaches the external geocoder. Text no source recognises resolves
/// to an all-null location, not an error.
pub(super) async fn resolve_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<ResolvedLocationData>>, ApiError> {
    let text = query.q.trim();
    if text.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query parameter 'q' must not be blank",
        ));
    }

    let location = motoria_geo::resolve(state.geocoder.as_ref(), text, &state.extra_cities).await;

    Ok(Json(ApiResponse {
        data: ResolvedLocationData {
            query: text.to_string(),
            location,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
