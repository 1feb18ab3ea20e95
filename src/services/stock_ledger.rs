//! Stock ledger - catalog mutations and the purchase/restock rules.
//!
//! Per item the quantity is a non-negative integer. A purchase of `q` moves
//! `n` to `n - q` only when `n >= q`; a restock of `q` moves `n` to `n + q`.
//! Both are delegated to single conditional updates in the repository, so
//! concurrent callers never observe or produce a negative quantity.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::DEFAULT_PURCHASE_QUANTITY;
use crate::domain::{CatalogQuery, Item, ItemChanges, NewItem};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ItemRepository, StockUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Stock ledger trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Add an item to the catalog
    async fn create(&self, item: NewItem, created_by: Uuid) -> AppResult<Item>;

    /// Partially update an item
    async fn update(&self, id: Uuid, changes: ItemChanges) -> AppResult<Item>;

    /// Remove an item from the catalog
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Get a single item
    async fn get(&self, id: Uuid) -> AppResult<Item>;

    /// Items matching the query, newest first
    async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<Item>>;

    /// Take stock out; `None` purchases one unit
    async fn purchase(&self, id: Uuid, quantity: Option<i64>) -> AppResult<Item>;

    /// Put stock back in; the quantity is required
    async fn restock(&self, id: Uuid, quantity: Option<i64>) -> AppResult<Item>;
}

/// Concrete implementation of [`StockLedger`] over an item repository.
pub struct Inventory<R: ItemRepository> {
    items: Arc<R>,
}

impl<R: ItemRepository> Inventory<R> {
    pub fn new(items: Arc<R>) -> Self {
        Self { items }
    }
}

/// A stock movement must be a positive amount that fits the quantity column.
fn positive_quantity(quantity: i64) -> AppResult<i32> {
    if quantity <= 0 {
        return Err(AppError::invalid_quantity("Quantity must be a positive integer"));
    }
    i32::try_from(quantity).map_err(|_| AppError::invalid_quantity("Quantity is too large"))
}

#[async_trait]
impl<R: ItemRepository> StockLedger for Inventory<R> {
    async fn create(&self, item: NewItem, created_by: Uuid) -> AppResult<Item> {
        let item = self.items.create(item.validated()?, created_by).await?;
        tracing::info!(item_id = %item.id, created_by = %created_by, "Item created");
        Ok(item)
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> AppResult<Item> {
        let item = self
            .items
            .update(id, changes.validated()?)
            .await?
            .ok_or_not_found()?;
        tracing::info!(item_id = %id, "Item updated");
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.items.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Item> {
        self.items.find_by_id(id).await?.ok_or_not_found()
    }

    async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<Item>> {
        self.items.search(query).await
    }

    async fn purchase(&self, id: Uuid, quantity: Option<i64>) -> AppResult<Item> {
        let requested = quantity.unwrap_or(DEFAULT_PURCHASE_QUANTITY);
        if requested > i64::from(i32::MAX) {
            // No stock level can cover it
            let item = self.items.find_by_id(id).await?.ok_or_not_found()?;
            tracing::warn!(item_id = %id, requested, available = item.quantity, "Insufficient stock");
            return Err(AppError::InsufficientStock {
                requested,
                available: item.quantity,
            });
        }
        let amount = positive_quantity(requested)?;

        match self.items.decrement_if_available(id, amount).await? {
            StockUpdate::Applied(item) => {
                tracing::info!(item_id = %id, quantity = amount, remaining = item.quantity, "Purchase recorded");
                Ok(item)
            }
            StockUpdate::Rejected { available } => {
                tracing::warn!(item_id = %id, requested, available, "Insufficient stock");
                Err(AppError::InsufficientStock {
                    requested,
                    available,
                })
            }
            StockUpdate::Missing => Err(AppError::NotFound),
        }
    }

    async fn restock(&self, id: Uuid, quantity: Option<i64>) -> AppResult<Item> {
        let requested =
            quantity.ok_or_else(|| AppError::invalid_quantity("Please provide a valid quantity"))?;
        let amount = positive_quantity(requested)?;

        match self.items.increment(id, amount).await? {
            StockUpdate::Applied(item) => {
                tracing::info!(item_id = %id, quantity = amount, total = item.quantity, "Restock recorded");
                Ok(item)
            }
            StockUpdate::Rejected { available } => {
                tracing::warn!(item_id = %id, requested, available, "Restock would overflow stock level");
                Err(AppError::invalid_quantity("Restock would exceed the maximum stock level"))
            }
            StockUpdate::Missing => Err(AppError::NotFound),
        }
    }
}
