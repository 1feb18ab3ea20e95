//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository traits for
//! dependency inversion.

mod container;
mod credential_store;
mod stock_ledger;
mod token_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use credential_store::{AccountRegistry, CredentialStore, Registration};
pub use stock_ledger::{Inventory, StockLedger};
pub use token_service::{Claims, IssuedToken, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use credential_store::MockCredentialStore;
#[cfg(any(test, feature = "test-utils"))]
pub use stock_ledger::MockStockLedger;
