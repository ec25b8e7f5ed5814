//! Shared test setup

use lectern::{config::AppConfig, repository::Repository, services::Services};
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory store with the schema applied and services wired.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup() -> (Repository, Services) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    let repository = Repository::new(pool);
    repository.migrate().await.expect("Failed to migrate");

    let services = Services::new(repository.clone(), &AppConfig::default());
    (repository, services)
}
