//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod account_repository;
pub(crate) mod entities;
mod item_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use item_repository::{ItemRepository, ItemStore, StockUpdate};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use item_repository::MockItemRepository;
