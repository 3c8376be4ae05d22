//! Covenant schedule server
//!
//! REST API over the schedule generator and its SQLite store.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use covenant_schedule::api::{AppState, create_router};
use covenant_schedule::config::ConfigLoader;
use covenant_schedule::store::SqliteScheduleStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Covenant schedule server
#[derive(Parser, Debug)]
#[command(name = "covenant-schedule")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration directory containing generator.yaml
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "COVENANT_SCHEDULE_CONFIG",
        default_value = "./config"
    )]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, env = "COVENANT_SCHEDULE_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// SQLite database file, overriding database_path in generator.yaml
    #[arg(long, env = "COVENANT_SCHEDULE_DB")]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COVENANT_SCHEDULE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let loader = ConfigLoader::load(&args.config)?;
    let generator = loader.build_generator();
    let database_path = args.database.unwrap_or_else(|| loader.database_path());
    tracing::info!(
        config = %args.config.display(),
        adjustment = %loader.config().business_day_adjustment,
        holiday_count = generator.calendar().holidays().len(),
        database = %database_path.display(),
        "Configuration loaded"
    );

    let store = SqliteScheduleStore::open(&database_path)?;
    let router = create_router(AppState::new(generator, store));

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    tracing::info!(address = %args.addr, "Starting server");
    axum::serve(listener, router).await?;

    Ok(())
}
