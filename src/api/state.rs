//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{CredentialStore, ServiceContainer, Services, StockLedger, TokenService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Account registration and login
    pub credentials: Arc<dyn CredentialStore>,
    /// Session token issue/verify
    pub tokens: Arc<TokenService>,
    /// Catalog and stock mutations
    pub ledger: Arc<dyn StockLedger>,
    /// Database connection
    pub database: Arc<Database>,
    /// Allowed browser origin, if any
    pub cors_origin: Option<String>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database, config.cors_origin.clone())
    }

    /// Create application state from any service container.
    pub fn new(
        services: &dyn ServiceContainer,
        database: Arc<Database>,
        cors_origin: Option<String>,
    ) -> Self {
        Self {
            credentials: services.credentials(),
            tokens: services.tokens(),
            ledger: services.ledger(),
            database,
            cors_origin,
        }
    }
}
