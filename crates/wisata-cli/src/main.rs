mod lookup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "wisata-cli")]
#[command(about = "Resolve addresses, localities and nearby places via SerpAPI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an address or place name to a coordinate
    Geocode {
        /// Free-text address (e.g., "Gedung Sate, Bandung")
        address: String,
    },
    /// Resolve a coordinate to a locality name
    Locality {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Search for places around a coordinate
    Places {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search text (defaults to "tempat wisata")
        #[arg(long)]
        query: Option<String>,
        /// Locality bias; resolved from the coordinate when omitted
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
        /// Rewrite thumbnails to go through the image proxy
        #[arg(long)]
        proxy_images: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = wisata_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let gazetteer = wisata_core::load_gazetteer(config.gazetteer_path.as_deref())?;
    let service = wisata_serp::LocationService::from_app_config(&config, gazetteer)?;

    match cli.command {
        Commands::Geocode { address } => lookup::run_geocode(&service, &address).await,
        Commands::Locality { lat, lon } => lookup::run_locality(&service, lat, lon).await,
        Commands::Places {
            lat,
            lon,
            query,
            location,
            page,
            page_size,
            proxy_images,
        } => {
            let request = lookup::places_request(
                lat,
                lon,
                query,
                location,
                page,
                page_size,
                proxy_images,
            );
            lookup::run_places(&service, &request).await
        }
    }
}
