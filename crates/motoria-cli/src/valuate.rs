//! Valuation command handlers for the CLI.

use futures::StreamExt;
use uuid::Uuid;

use motoria_valuation::{euros_to_cents, fair_price_cents, price_trend, HISTORY_WINDOW};

/// How many vehicles are valuated concurrently in `--all` runs.
const VALUATE_CONCURRENCY: usize = 8;

/// Format a cents amount as euros for display, returning `"—"` when `None`.
fn fmt_cents(cents: Option<i64>) -> String {
    cents.map_or_else(
        || "\u{2014}".to_string(),
        |c| format!("{}.{:02} EUR", c / 100, (c % 100).abs()),
    )
}

/// The blended fair price for one vehicle, or `None` when the vehicle has
/// neither history nor comparables.
async fn estimate(pool: &sqlx::PgPool, public_id: Uuid) -> anyhow::Result<Valuation> {
    let vehicle = motoria_db::vehicle_for_valuation(pool, public_id).await?;

    #[allow(clippy::cast_possible_wrap)]
    let history = motoria_db::recent_prices_cents(pool, vehicle.id, HISTORY_WINDOW as i64).await?;

    let comparable =
        match motoria_db::cached_category_mean_cents(pool, &vehicle.category, vehicle.year).await? {
            Some(mean) => Some(mean),
            None => {
                motoria_db::comparable_mean_cents(pool, &vehicle.category, vehicle.year, vehicle.id)
                    .await?
            }
        };

    Ok(Valuation {
        public_id: vehicle.public_id,
        brand: vehicle.brand,
        category: vehicle.category,
        year: vehicle.year,
        current_cents: euros_to_cents(vehicle.price),
        fair_cents: fair_price_cents(&history, comparable),
        trend: price_trend(&history),
    })
}

struct Valuation {
    public_id: Uuid,
    brand: String,
    category: String,
    year: i16,
    current_cents: Option<i64>,
    fair_cents: Option<i64>,
    trend: motoria_valuation::PriceTrend,
}

/// Print the fair-price estimate for a single vehicle.
///
/// # Errors
///
/// Returns an error if the vehicle is not published or a query fails.
pub(crate) async fn run_valuate_one(pool: &sqlx::PgPool, public_id: Uuid) -> anyhow::Result<()> {
    let v = estimate(pool, public_id).await?;

    println!("vehicle:  {} ({} {} {})", v.public_id, v.brand, v.category, v.year);
    println!("current:  {}", fmt_cents(v.current_cents));
    println!("fair:     {}", fmt_cents(v.fair_cents));
    println!("trend:    {:?}", v.trend);

    Ok(())
}

/// Valuate every published vehicle, a summary line per vehicle.
///
/// Vehicles are processed concurrently; a failure for one vehicle is
/// logged and skipped rather than aborting the run.
///
/// # Errors
///
/// Returns an error if the id listing query fails.
pub(crate) async fn run_valuate_all(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let ids = motoria_db::published_vehicle_ids(pool).await?;
    if ids.is_empty() {
        println!("no published vehicles");
        return Ok(());
    }

    let header = format!("{:<38}{:<16}{:<16}TREND", "VEHICLE", "CURRENT", "FAIR");
    println!("{header}");

    let mut results = futures::stream::iter(ids.into_iter().map(|id| {
        let pool = pool.clone();
        async move { (id, estimate(&pool, id).await) }
    }))
    .buffer_unordered(VALUATE_CONCURRENCY);

    let mut valuated = 0u32;
    while let Some((id, result)) = results.next().await {
        match result {
            Ok(v) => {
                println!(
                    "{:<38}{:<16}{:<16}{:?}",
                    v.public_id,
                    fmt_cents(v.current_cents),
                    fmt_cents(v.fair_cents),
                    v.trend
                );
                valuated += 1;
            }
            Err(e) => {
                tracing::warn!(vehicle_id = %id, error = %e, "skipping vehicle, valuation failed");
            }
        }
    }

    println!();
    println!("valuated {valuated} vehicles");

    Ok(())
}

/// Rebuild the category price-stats cache and report the row count.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub(crate) async fn run_refresh_stats(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let rows = motoria_db::refresh_category_price_stats(pool).await?;
    println!("refreshed {rows} category/year rows");
    Ok(())
}
