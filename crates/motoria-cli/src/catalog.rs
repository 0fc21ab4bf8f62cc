//! Catalog inspection command handlers for the CLI.
//!
//! Read-only commands mirroring what the catalog endpoints serve: the
//! published-vehicle count at a scope, and a preview of the next wider
//! scope.

use clap::{Args, Subcommand};

use motoria_core::{GeoLevel, LocationConstraint, UserLocation, VehicleFilters};
use motoria_db::PgVehicleCounts;
use motoria_geo::{constraint_for_level, escalation_advice, preview_escalation, tables};

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Count published vehicles at a scope
    Count(ScopeArgs),
    /// Preview the next wider scope for a search
    Preview(ScopeArgs),
}

/// A catalog search described on the command line: scope level, the user's
/// geography, and the non-location filters.
#[derive(Debug, Args)]
pub struct ScopeArgs {
    /// Scope level (provincia, comunidad, limitrofes, nacional,
    /// suroeste_europeo, union_europea, europa, mundo)
    #[arg(long)]
    level: Option<GeoLevel>,
    /// ISO country code of the user (e.g. ES)
    #[arg(long)]
    country: Option<String>,
    /// Province of the user (e.g. Lérida)
    #[arg(long)]
    province: Option<String>,
    /// Comunidad of the user; derived from the province when omitted
    #[arg(long)]
    region: Option<String>,
    /// Vehicle category filter
    #[arg(long)]
    category: Option<String>,
    /// Vehicle brand filter
    #[arg(long)]
    brand: Option<String>,
    /// Minimum price in euros
    #[arg(long)]
    price_min: Option<i64>,
    /// Maximum price in euros
    #[arg(long)]
    price_max: Option<i64>,
    /// Minimum model year
    #[arg(long)]
    year_min: Option<i16>,
    /// Maximum model year
    #[arg(long)]
    year_max: Option<i16>,
}

impl ScopeArgs {
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

    fn filters(&self, location: &UserLocation) -> VehicleFilters {
        VehicleFilters {
            category: self.category.clone(),
            brand: self.brand.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            year_min: self.year_min,
            year_max: self.year_max,
            location: self.level.map_or(LocationConstraint::None, |level| {
                constraint_for_level(level, location)
            }),
        }
    }
}

/// Dispatch a `catalog` sub-command.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run(pool: &sqlx::PgPool, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::Count(args) => run_count(pool, &args).await,
        CatalogCommands::Preview(args) => run_preview(pool, &args).await,
    }
}

async fn run_count(pool: &sqlx::PgPool, args: &ScopeArgs) -> anyhow::Result<()> {
    let location = args.location();
    let filters = args.filters(&location);

    let count = motoria_db::count_published_vehicles(pool, &filters).await?;
    let advice = escalation_advice(args.level, count);

    println!("level:  {}", args.level.map_or("(none)".to_string(), |l| l.to_string()));
    println!("count:  {count}");
    println!("advice: {}", serde_json::to_string(&advice)?);

    Ok(())
}

async fn run_preview(pool: &sqlx::PgPool, args: &ScopeArgs) -> anyhow::Result<()> {
    let location = args.location();
    let filters = args.filters(&location);

    let current = motoria_db::count_published_vehicles(pool, &filters).await?;
    let probe = PgVehicleCounts::new(pool.clone());
    let preview = preview_escalation(&probe, &filters, args.level, &location).await;

    println!("current count: {current}");
    println!("{}", serde_json::to_string_pretty(&preview)?);

    Ok(())
}
