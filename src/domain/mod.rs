//! Domain layer - Core business entities and logic
//!
//! Accounts, roles, catalog items, the catalog query predicate and the
//! password verifier. Nothing here touches the database or HTTP.

pub mod account;
pub mod catalog_query;
pub mod item;
pub mod password;

pub use account::{normalize_email, Account, AccountResponse, NewAccount, Role};
pub use catalog_query::CatalogQuery;
pub use item::{Category, Item, ItemChanges, NewItem};
pub use password::Password;
