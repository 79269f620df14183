//! Flightdeck entry point: standalone orchestrator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use flightdeck::adapters::memory::{InMemoryKvStore, InMemoryQueueProvider};
use flightdeck::adapters::reconcilers::logging_reconcilers;
use flightdeck::adapters::sqlite::{initialize_database, PoolConfig, SqliteOrganizationRepository};
use flightdeck::domain::models::config::Config;
use flightdeck::domain::models::periodic::default_task_metadata;
use flightdeck::infrastructure::config::ConfigLoader;
use flightdeck::infrastructure::logging::Logger;
use flightdeck::services::{
    executor_map, OrganizationDirectory, PeriodicTaskConsumer, PeriodicTaskPublisher,
};

#[derive(Parser)]
#[command(name = "flightdeck", about = "Multi-tenant periodic task orchestrator")]
struct Cli {
    /// Path to a config file. Defaults to the .flightdeck/ hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run publisher and consumer in one process until interrupted.
    Serve,
    /// Apply database migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = Logger::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Migrate => migrate(&config).await,
        Commands::Serve => serve(config).await,
    }
}

async fn migrate(config: &Config) -> Result<()> {
    let database_url = format!("sqlite:{}", config.database.path);
    initialize_database(&database_url, pool_config(config))
        .await
        .context("Failed to run database migrations")?;
    info!("migrations applied");
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let database_url = format!("sqlite:{}", config.database.path);
    let pool = initialize_database(&database_url, pool_config(&config))
        .await
        .context("Failed to initialize database")?;

    let org_repo = Arc::new(SqliteOrganizationRepository::new(pool));
    let org_directory = Arc::new(OrganizationDirectory::new(org_repo));

    let kv_store = Arc::new(InMemoryKvStore::new());
    let queue_provider = Arc::new(InMemoryQueueProvider::new());

    let publisher = PeriodicTaskPublisher::new(
        kv_store,
        org_directory,
        queue_provider.as_ref(),
        default_task_metadata(),
    )?
    .with_intervals(
        Duration::from_secs(config.orchestrator.task_tick_secs),
        Duration::from_secs(config.orchestrator.org_refresh_secs),
    );

    let executors = executor_map(logging_reconcilers());
    let consumer = PeriodicTaskConsumer::new(queue_provider, executors);

    let cancel = CancellationToken::new();
    let publisher_task = tokio::spawn(publisher.run(cancel.clone()));
    let consumer_task = tokio::spawn(consumer.start(cancel.clone()));

    info!("flightdeck orchestrator running");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("shutting down");
    cancel.cancel();
    publisher_task.await.context("Publisher task panicked")?;
    consumer_task
        .await
        .context("Consumer task panicked")?
        .context("Consumer exited with error")?;

    Ok(())
}

fn pool_config(config: &Config) -> Option<PoolConfig> {
    Some(PoolConfig {
        max_connections: config.database.max_connections,
        ..PoolConfig::default()
    })
}
