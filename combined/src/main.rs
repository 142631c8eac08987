//! Storefront binary - serves the API, manages the schema, seeds sample data.

mod migrate;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::seed::{self, DEFAULT_CATEGORIES, DEFAULT_PRODUCTS_PER_CATEGORY};
use common::Database;
use gateway_lib::config::GatewayConfig;

use crate::migrate::{MigrateAction, ServiceScope};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "User directory and catalog query API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "SERVER_HOST")]
        host: Option<String>,
        #[arg(long, env = "SERVER_PORT")]
        port: Option<u16>,
        /// Apply pending migrations before serving
        #[arg(long)]
        migrate: bool,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
        #[arg(long, value_enum, default_value = "all", global = true)]
        service: ServiceScope,
    },
    /// Populate the catalog with sample categories and products
    GenerateData {
        #[arg(long, default_value_t = DEFAULT_CATEGORIES)]
        categories: u32,
        #[arg(long, default_value_t = DEFAULT_PRODUCTS_PER_CATEGORY)]
        products_per_category: u32,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();

    match cli.command {
        Commands::Serve {
            host,
            port,
            migrate,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let db = Database::connect(&config.database).await?;
            if migrate {
                migrate::run(&db, MigrateAction::Up, ServiceScope::All).await?;
            }

            info!("Starting storefront API on http://{}", config.bind_address());
            gateway_lib::run_server_with_database(db, config).await?;
        }
        Commands::Migrate { action, service } => {
            let db = Database::connect(&config.database).await?;
            migrate::run(&db, action, service).await?;
        }
        Commands::GenerateData {
            categories,
            products_per_category,
        } => {
            let db = Database::connect(&config.database).await?;
            seed::generate(db.connection(), categories, products_per_category).await?;
        }
    }

    Ok(())
}
