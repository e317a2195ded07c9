use activity_signup::{config::Config, seed::Seed, server, service::ActivityService};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_filter.parse()?),
        )
        .init();

    info!("Starting activity sign-up service");

    let seed = match &config.seed_file {
        Some(path) => {
            info!("Loading seed from {}", path.display());
            Seed::from_json_file(path)?
        }
        None => Seed::school_default(),
    };
    let service = ActivityService::from_seed(&seed).context("Invalid seed data")?;
    info!("✓ Loaded {} activities", service.catalog().len());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    server::serve(listener, Arc::new(service)).await
}
