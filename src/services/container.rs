//! Service container - centralized access to the application services.
//!
//! Handlers depend on the service traits, never on the concrete
//! implementations, so tests can swap in mocks.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{AccountRegistry, CredentialStore, Inventory, StockLedger, TokenService};
use crate::config::Config;
use crate::infra::{AccountStore, ItemStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get the credential store
    fn credentials(&self) -> Arc<dyn CredentialStore>;

    /// Get the session token service
    fn tokens(&self) -> Arc<TokenService>;

    /// Get the stock ledger
    fn ledger(&self) -> Arc<dyn StockLedger>;
}

/// Concrete implementation of [`ServiceContainer`]
#[derive(Clone)]
pub struct Services {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    ledger: Arc<dyn StockLedger>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: &Config) -> Self {
        let accounts = Arc::new(AccountStore::new(db.clone()));
        let items = Arc::new(ItemStore::new(db));

        Self {
            credentials: Arc::new(AccountRegistry::new(accounts)),
            tokens: Arc::new(TokenService::from_config(config)),
            ledger: Arc::new(Inventory::new(items)),
        }
    }
}

impl ServiceContainer for Services {
    fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.credentials.clone()
    }

    fn tokens(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    fn ledger(&self) -> Arc<dyn StockLedger> {
        self.ledger.clone()
    }
}
