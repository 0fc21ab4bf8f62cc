//! Published-vehicle queries: the filtered count used by the geo-fallback
//! engine and the listing enumeration used by batch valuation.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use motoria_core::{LocationConstraint, VehicleFilters};
use motoria_geo::VehicleCountProbe;

use crate::DbError;

/// The tagged location constraint rendered as three mutually exclusive
/// bind parameters; the union guarantees at most one is `Some`.
fn location_params(
    location: &LocationConstraint,
) -> (Option<String>, Option<Vec<String>>, Option<Vec<String>>) {
    match location {
        LocationConstraint::Province { value } => (Some(value.clone()), None, None),
        LocationConstraint::Regions { values } => (None, Some(values.clone()), None),
        LocationConstraint::Countries { values } => (None, None, Some(values.clone())),
        LocationConstraint::None => (None, None, None),
    }
}

/// Count published vehicles matching the filters.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_published_vehicles(
    pool: &PgPool,
    filters: &VehicleFilters,
) -> Result<u32, DbError> {
    let (province, provinces, countries) = location_params(&filters.location);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM vehicles \
         WHERE status = 'published' \
           AND ($1::TEXT IS NULL OR category = $1) \
           AND ($2::TEXT IS NULL OR brand = $2) \
           AND ($3::NUMERIC IS NULL OR price >= $3) \
           AND ($4::NUMERIC IS NULL OR price <= $4) \
           AND ($5::SMALLINT IS NULL OR year >= $5) \
           AND ($6::SMALLINT IS NULL OR year <= $6) \
           AND ($7::TEXT IS NULL OR location_province = $7) \
           AND ($8::TEXT[] IS NULL OR location_province = ANY($8)) \
           AND ($9::TEXT[] IS NULL OR location_country = ANY($9))",
    )
    .bind(filters.category.as_deref())
    .bind(filters.brand.as_deref())
    .bind(filters.price_min.map(Decimal::from))
    .bind(filters.price_max.map(Decimal::from))
    .bind(filters.year_min)
    .bind(filters.year_max)
    .bind(province)
    .bind(provinces)
    .bind(countries)
    .fetch_one(pool)
    .await?;

    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// All published vehicle ids, for batch valuation runs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn published_vehicle_ids(pool: &PgPool) -> Result<Vec<Uuid>, DbError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT public_id FROM vehicles WHERE status = 'published' ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// [`VehicleCountProbe`] backed by the vehicles table.
#[derive(Clone)]
pub struct PgVehicleCounts {
    pool: PgPool,
}

impl PgVehicleCounts {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl VehicleCountProbe for PgVehicleCounts {
    type Error = DbError;

    async fn count_published(&self, filters: &VehicleFilters) -> Result<u32, DbError> {
        count_published_vehicles(&self.pool, filters).await
    }
}
