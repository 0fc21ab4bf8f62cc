use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use motoria_core::{
    level_label, CatalogState, GeoLevel, LocationConstraint, UserLocation, VehicleFilters,
};
use motoria_geo::{
    constraint_for_level, escalate, escalation_advice, preview_escalation, tables,
    EscalationAdvice, EscalationPreview,
};
use motoria_db::PgVehicleCounts;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Flat query-string form of a catalog search: the vehicle filters plus
/// the scope level and the user's geography.
#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub year_min: Option<i16>,
    pub year_max: Option<i16>,
    pub level: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CatalogCountData {
    level: Option<GeoLevel>,
    count: u32,
    advice: EscalationAdvice,
}

#[derive(Debug, Serialize)]
pub(super) struct CatalogEscalationData {
    current_level: Option<GeoLevel>,
    current_count: u32,
    advice: EscalationAdvice,
    preview: EscalationPreview,
}

#[derive(Debug, Deserialize)]
pub(super) struct EscalateRequest {
    pub state: CatalogState,
    pub location: UserLocation,
}

#[derive(Debug, Serialize)]
pub(super) struct EscalateData {
    state: CatalogState,
    /// Display name of the new scope, for the widening banner.
    level_label: String,
}

impl CatalogQuery {
    /// The scope level, if one was requested.
    fn parse_level(&self, request_id: &str) -> Result<Option<GeoLevel>, ApiError> {
        match self.level.as_deref() {
            None => Ok(None),
            Some(raw) => raw.parse::<GeoLevel>().map(Some).map_err(|e| {
                ApiError::new(request_id.to_string(), "validation_error", e)
            }),
        }
    }

    /// The user's geography, canonicalised against the province tables.
    ///
    /// An unspecified region is derived from the province so that level
    /// labels and comunidad constraints work from a province alone.
    fn location(&self) -> UserLocation {
        let province = self
            .province
            .as_deref()
            .map(|p| tables::canonical_province(p).map_or_else(|| p.to_string(), String::from));
        let region = self.region.clone().or_else(|| {
            province
                .as_deref()
                .and_then(tables::region_of_province)
                .map(String::from)
        });

        UserLocation {
            country: self.country.as_deref().map(str::to_uppercase),
            province,
            region,
        }
    }

    /// The vehicle filters this query describes, with the location
    /// constraint appropriate to the requested level.
    fn filters(&self, level: Option<GeoLevel>, location: &UserLocation) -> VehicleFilters {
        VehicleFilters {
            category: self.category.clone(),
            brand: self.brand.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            year_min: self.year_min,
            year_max: self.year_max,
            location: level.map_or(LocationConstraint::None, |level| {
                constraint_for_level(level, location)
            }),
        }
    }
}

/// `GET /api/v1/catalog/count` — how many published vehicles match at the
/// requested scope, plus what to do about it.
pub(super) async fn catalog_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogCountData>>, ApiError> {
    let level = query.parse_level(&req_id.0)?;
    let location = query.location();
    let filters = query.filters(level, &location);

    let count = motoria_db::count_published_vehicles(&state.pool, &filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CatalogCountData {
            level,
            count,
            advice: escalation_advice(level, count),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/catalog/escalation` — the current count plus a preview of
/// the next wider scope, for "N results in X" teasers.
pub(super) async fn catalog_escalation(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogEscalationData>>, ApiError> {
    let level = query.parse_level(&req_id.0)?;
    let location = query.location();
    let filters = query.filters(level, &location);

    let current_count = motoria_db::count_published_vehicles(&state.pool, &filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let probe = PgVehicleCounts::new(state.pool.clone());
    let preview = preview_escalation(&probe, &filters, level, &location).await;

    Ok(Json(ApiResponse {
        data: CatalogEscalationData {
            current_level: level,
            current_count,
            advice: escalation_advice(level, current_count),
            preview,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/catalog/escalate` — widen a catalog state by one level.
///
/// The transition is pure state-in, state-out; nothing is persisted. A
/// state already at world scope, or with no scope set, cannot widen and
/// yields a conflict.
pub(super) async fn catalog_escalate(
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<EscalateRequest>,
) -> Result<Json<ApiResponse<EscalateData>>, ApiError> {
    let Some(widened) = escalate(&request.state, &request.location) else {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "no wider scope exists for this search",
        ));
    };

    let label = widened.level.map_or_else(String::new, |level| {
        level_label(
            level,
            request.location.province.as_deref(),
            request.location.region.as_deref(),
            request.location.country.as_deref(),
        )
    });

    Ok(Json(ApiResponse {
        data: EscalateData {
            state: widened,
            level_label: label,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(level: Option<&str>, province: Option<&str>, region: Option<&str>) -> CatalogQuery {
        CatalogQuery {
            category: None,
            brand: None,
            price_min: None,
            price_max: None,
            year_min: None,
            year_max: None,
            level: level.map(String::from),
            country: None,
            province: province.map(String::from),
            region: region.map(String::from),
        }
    }

    #[test]
    fn location_derives_region_from_province() {
        let location = query(None, Some("Lérida"), None).location();
        assert_eq!(location.province.as_deref(), Some("Lérida"));
        assert_eq!(location.region.as_deref(), Some("Cataluña"));
    }

    #[test]
    fn location_canonicalises_province_aliases() {
        let location = query(None, Some("Lleida"), None).location();
        assert_eq!(location.province.as_deref(), Some("Lérida"));
    }

    #[test]
    fn location_keeps_explicit_region() {
        let location = query(None, Some("Madrid"), Some("Comunidad de Madrid")).location();
        assert_eq!(location.region.as_deref(), Some("Comunidad de Madrid"));
    }

    #[test]
    fn parse_level_rejects_unknown_names() {
        let err = query(Some("galaxia"), None, None)
            .parse_level("req-1")
            .expect_err("unknown level should fail");
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn filters_without_level_have_no_location_constraint() {
        let q = query(None, Some("Madrid"), None);
        let filters = q.filters(None, &q.location());
        assert!(filters.location.is_none());
    }

    #[test]
    fn filters_at_provincia_pin_the_province() {
        let q = query(Some("provincia"), Some("Madrid"), None);
        let location = q.location();
        let filters = q.filters(Some(GeoLevel::Provincia), &location);
        assert_eq!(
            filters.location,
            LocationConstraint::Province {
                value: "Madrid".to_string()
            }
        );
    }
}
