//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring category price-stats refresh job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Registers the nightly stats refresh and starts the scheduler. Returns
/// the running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<motoria_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_stats_refresh_job(&scheduler, pool, &config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the nightly category price-stats refresh.
///
/// Runs at 04:00 UTC by default (`0 0 4 * * *`) and can be overridden with
/// `MOTORIA_STATS_REFRESH_CRON`. Recomputes the cached per-(category, year)
/// mean prices used by the valuation endpoint.
async fn register_stats_refresh_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: &motoria_core::AppConfig,
) -> Result<(), JobSchedulerError> {
    let cron = config.stats_refresh_cron.clone();
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);

        Box::pin(async move {
            tracing::info!("scheduler: starting nightly price-stats refresh");
            run_stats_refresh_job(&pool).await;
            tracing::info!("scheduler: nightly price-stats refresh complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Recompute cached category price means and log the result.
async fn run_stats_refresh_job(pool: &PgPool) {
    match motoria_db::refresh_category_price_stats(pool).await {
        Ok(rows) => {
            tracing::info!(rows, "scheduler: category price stats refreshed");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: price-stats refresh failed");
        }
    }
}
