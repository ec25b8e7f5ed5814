//! Business logic services

pub mod catalog;
pub mod credentials;
pub mod import;
pub mod lending;
pub mod session;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub credentials: credentials::CredentialsService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub import: import::ImportService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let catalog = catalog::CatalogService::new(repository.clone());
        Self {
            credentials: credentials::CredentialsService::new(
                repository.clone(),
                config.bootstrap.clone(),
            ),
            lending: lending::LendingService::new(repository.clone(), config.lending.clone()),
            import: import::ImportService::new(repository, catalog.clone()),
            catalog,
        }
    }

    /// Open a fresh, logged-out session over the credential store
    pub fn session(&self) -> session::Session {
        session::Session::new(self.credentials.clone())
    }
}
