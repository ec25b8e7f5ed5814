//! Lectern - Classroom Lending Library Core
//!
//! Headless bootstrap binary: prepares the store (schema + default admin)
//! so an embedding front end can open it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern::{config::AppConfig, repository::Repository, services::Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lectern={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lectern v{}", env!("CARGO_PKG_VERSION"));

    let repository = Repository::connect(&config.database).await?;

    repository.migrate().await?;
    tracing::info!("Schema migration completed");

    let services = Services::new(repository, &config);
    services.credentials.bootstrap().await?;

    tracing::info!(path = %config.database.path, "Store ready");
    Ok(())
}
