//! Price-history reads and the comparable-price cache feeding the
//! valuation estimator.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use motoria_valuation::{euros_to_cents, COMPARABLE_YEAR_SPAN};

use crate::DbError;

/// The listing fields the valuation endpoint needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleValuationRow {
    pub id: i64,
    pub public_id: Uuid,
    pub brand: String,
    pub category: String,
    pub year: i16,
    pub price: Decimal,
}

/// Look up a published vehicle by its public id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no published vehicle has that id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn vehicle_for_valuation(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<VehicleValuationRow, DbError> {
    sqlx::query_as::<_, VehicleValuationRow>(
        "SELECT id, public_id, brand, category, year, price \
         FROM vehicles WHERE public_id = $1 AND status = 'published'",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// The vehicle's most recent recorded prices in cents, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_prices_cents(
    pool: &PgPool,
    vehicle_id: i64,
    limit: i64,
) -> Result<Vec<i64>, DbError> {
    let prices = sqlx::query_scalar::<_, Decimal>(
        "SELECT price FROM vehicle_price_history \
         WHERE vehicle_id = $1 ORDER BY recorded_at DESC LIMIT $2",
    )
    .bind(vehicle_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(prices.into_iter().filter_map(euros_to_cents).collect())
}

/// Live mean price in cents of published vehicles in `category` within
/// ±3 model years, the vehicle itself excluded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn comparable_mean_cents(
    pool: &PgPool,
    category: &str,
    year: i16,
    exclude_vehicle_id: i64,
) -> Result<Option<i64>, DbError> {
    let mean = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT AVG(price) FROM vehicles \
         WHERE status = 'published' \
           AND category = $1 \
           AND year BETWEEN $2 AND $3 \
           AND id <> $4",
    )
    .bind(category)
    .bind(year - COMPARABLE_YEAR_SPAN)
    .bind(year + COMPARABLE_YEAR_SPAN)
    .bind(exclude_vehicle_id)
    .fetch_one(pool)
    .await?;

    Ok(mean.and_then(euros_to_cents))
}

/// Rebuild the per-category/year mean-price cache from published listings.
///
/// Returns the number of upserted rows. Stale rows for category/year pairs
/// that no longer have published vehicles are left in place; their
/// `refreshed_at` marks them as old.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn refresh_category_price_stats(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query(
        "INSERT INTO category_price_stats (category, year, mean_price_cents, sample_count, refreshed_at) \
         SELECT category, year, ROUND(AVG(price) * 100)::BIGINT, COUNT(*), NOW() \
         FROM vehicles WHERE status = 'published' \
         GROUP BY category, year \
         ON CONFLICT (category, year) DO UPDATE SET \
             mean_price_cents = EXCLUDED.mean_price_cents, \
             sample_count = EXCLUDED.sample_count, \
             refreshed_at = EXCLUDED.refreshed_at",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Cached comparable mean in cents for `category` within ±3 model years:
/// the sample-weighted average over the cached per-year means.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn cached_category_mean_cents(
    pool: &PgPool,
    category: &str,
    year: i16,
) -> Result<Option<i64>, DbError> {
    let mean = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT (SUM(mean_price_cents::NUMERIC * sample_count) / NULLIF(SUM(sample_count), 0))::BIGINT \
         FROM category_price_stats \
         WHERE category = $1 AND year BETWEEN $2 AND $3",
    )
    .bind(category)
    .bind(year - COMPARABLE_YEAR_SPAN)
    .bind(year + COMPARABLE_YEAR_SPAN)
    .fetch_one(pool)
    .await?;

    Ok(mean)
}
