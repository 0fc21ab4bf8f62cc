use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use motoria_valuation::{
    euros_to_cents, fair_price_cents, price_trend, PriceTrend, HISTORY_WINDOW,
};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ValuationQuery {
    pub vehicle_id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct ValuationData {
    vehicle_id: Uuid,
    brand: String,
    category: String,
    year: i16,
    current_price_cents: Option<i64>,
    /// Blended estimate, absent when the vehicle has neither history nor
    /// comparables.
    fair_price_cents: Option<i64>,
    trend: PriceTrend,
    history_points: usize,
}

/// `GET /api/v1/valuation?vehicle_id=` — the fair-price estimate for a
/// published vehicle.
///
/// The comparable mean comes from the nightly `category_price_stats` cache
/// when it covers the category; an unpopulated cache falls back to a live
/// aggregate over published listings.
pub(super) async fn get_valuation(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ValuationQuery>,
) -> Result<Json<ApiResponse<ValuationData>>, ApiError> {
    let vehicle = motoria_db::vehicle_for_valuation(&state.pool, query.vehicle_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    #[allow(clippy::cast_possible_wrap)]
    let history =
        motoria_db::recent_prices_cents(&state.pool, vehicle.id, HISTORY_WINDOW as i64)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let cached =
        motoria_db::cached_category_mean_cents(&state.pool, &vehicle.category, vehicle.year)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let comparable = match cached {
        Some(mean) => Some(mean),
        None => motoria_db::comparable_mean_cents(
            &state.pool,
            &vehicle.category,
            vehicle.year,
            vehicle.id,
        )
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?,
    };

    Ok(Json(ApiResponse {
        data: ValuationData {
            vehicle_id: vehicle.public_id,
            brand: vehicle.brand,
            category: vehicle.category,
            year: vehicle.year,
            current_price_cents: euros_to_cents(vehicle.price),
            fair_price_cents: fair_price_cents(&history, comparable),
            trend: price_trend(&history),
            history_points: history.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
