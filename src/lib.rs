//! Sweet Shop API - inventory service for a sweet shop catalog.
//!
//! Account registration and login, role-gated catalog management and
//! stock tracking through purchases and restocks.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Accounts, items, roles, the catalog query and password verifier
//! - **services**: Credential store, session tokens and the stock ledger
//! - **infra**: Database connection, migrations and repositories
//! - **api**: HTTP handlers, authorization guard and routes
//! - **types**: Shared response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Account, CatalogQuery, Category, Item, Password, Role};
pub use errors::{AppError, AppResult};
