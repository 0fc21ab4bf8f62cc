mod catalog;
mod locations;
mod valuate;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "motoria-cli")]
#[command(about = "Motoria marketplace command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve free-text location input to a canonical geography
    Resolve {
        /// Location text as a user would type it (e.g. "lerida")
        text: String,
    },
    /// Inspect catalog counts and scope escalation
    Catalog {
        #[command(subcommand)]
        command: catalog::CatalogCommands,
    },
    /// Estimate fair prices for published vehicles
    Valuate {
        /// Public id of a single vehicle
        #[arg(long, conflicts_with = "all")]
        vehicle_id: Option<uuid::Uuid>,
        /// Valuate every published vehicle
        #[arg(long)]
        all: bool,
    },
    /// Rebuild the category price-stats cache
    RefreshStats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { text } => locations::run_resolve(&text).await,
        Commands::Catalog { command } => {
            let pool = motoria_db::connect_pool_from_env().await?;
            catalog::run(&pool, command).await
        }
        Commands::Valuate { vehicle_id, all } => {
            let pool = motoria_db::connect_pool_from_env().await?;
            match vehicle_id {
                Some(id) => valuate::run_valuate_one(&pool, id).await,
                None if all => valuate::run_valuate_all(&pool).await,
                None => anyhow::bail!("pass --vehicle-id <uuid> or --all"),
            }
        }
        Commands::RefreshStats => {
            let pool = motoria_db::connect_pool_from_env().await?;
            valuate::run_refresh_stats(&pool).await
        }
    }
}
