use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use database::{DatabaseConnectionInfo, PgDatabase};
use distance::DistanceService;
use mapbox::MapboxClient;

/// Batch maintenance for the location distance cache.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate the distance table for DC -> recycling pairs and shipment
    /// pickup -> DC pairs.
    Populate {
        /// Recalculate even if a record already exists.
        #[arg(long)]
        force: bool,
    },
    /// Force-recompute the distance for every DC with a recycling partner.
    RecalcRecycling,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let database_connection_info = DatabaseConnectionInfo::from_env()
        .ok_or("expected database connection info in env")?;
    let database = PgDatabase::connect(database_connection_info).await?;

    let routing = MapboxClient::from_env();
    if !routing.is_configured() {
        log::warn!("MAPBOX_ACCESS_TOKEN not set; routed lookups will be skipped");
    }

    let service = DistanceService::new(database, Arc::new(routing));

    match cli.command {
        Command::Populate { force } => {
            println!("Processing DC -> recycling distances...");
            let recycling = service.populate_recycling_distances(force).await?;
            println!(
                "DC -> recycling: processed {}, skipped {}, failed {}",
                recycling.processed, recycling.skipped, recycling.failed
            );

            println!("Processing shipment pickup -> DC distances...");
            let shipments = service.populate_shipment_distances(force).await?;
            println!(
                "Shipment pickup -> DC: processed {}, skipped {}, failed {}",
                shipments.processed, shipments.skipped, shipments.failed
            );
        }
        Command::RecalcRecycling => {
            let summary = service.populate_recycling_distances(true).await?;
            println!(
                "Recalculated recycling distances: processed {}, failed {}",
                summary.processed, summary.failed
            );
        }
    }

    Ok(())
}
