//! Item repository: catalog persistence and the conditional stock updates.
//!
//! Stock changes never read-modify-write. Each one is a single `UPDATE`
//! whose `WHERE` clause carries the availability condition, so the store
//! serializes concurrent changes to the same item and a lost update is
//! impossible.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};
use uuid::Uuid;

use super::entities::item::{self, ActiveModel, Entity as ItemEntity};
use crate::domain::{CatalogQuery, Item, ItemChanges, NewItem};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome of a conditional stock update
#[derive(Debug, Clone, PartialEq)]
pub enum StockUpdate {
    /// The change was applied; carries the item as stored afterwards
    Applied(Item),
    /// The item exists but the condition did not hold
    Rejected { available: i32 },
    /// No item with that id
    Missing,
}

/// Item repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Find item by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>>;

    /// All items matching the query, newest first
    async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<Item>>;

    /// Insert a new, already validated item
    async fn create(&self, item: NewItem, created_by: Uuid) -> AppResult<Item>;

    /// Apply the supplied fields. Returns `None` if the item does not exist.
    async fn update(&self, id: Uuid, changes: ItemChanges) -> AppResult<Option<Item>>;

    /// Remove an item. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomically subtract `quantity` if at least that much is in stock.
    async fn decrement_if_available(&self, id: Uuid, quantity: i32) -> AppResult<StockUpdate>;

    /// Atomically add `quantity` unless the result would overflow.
    async fn increment(&self, id: Uuid, quantity: i32) -> AppResult<StockUpdate>;
}

/// SeaORM-backed implementation of [`ItemRepository`]
pub struct ItemStore {
    db: DatabaseConnection,
}

impl ItemStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Re-read after a conditional update matched no row.
    async fn classify_rejection(&self, id: Uuid) -> AppResult<StockUpdate> {
        Ok(match self.find_by_id(id).await? {
            Some(item) => StockUpdate::Rejected {
                available: item.quantity,
            },
            None => StockUpdate::Missing,
        })
    }

    async fn applied(&self, id: Uuid) -> AppResult<StockUpdate> {
        Ok(match self.find_by_id(id).await? {
            Some(item) => StockUpdate::Applied(item),
            // Deleted between the update and the read
            None => StockUpdate::Missing,
        })
    }
}

/// Category and price bounds go to the store. The name fragment is matched
/// in memory because SQLite's `LOWER` only folds ASCII.
fn filtered(query: &CatalogQuery) -> Select<ItemEntity> {
    let mut select = ItemEntity::find();

    if let Some(category) = query.category() {
        select = select.filter(item::Column::Category.eq(category));
    }
    if let Some(min) = query.min_price() {
        select = select.filter(item::Column::Price.gte(min));
    }
    if let Some(max) = query.max_price() {
        select = select.filter(item::Column::Price.lte(max));
    }

    select
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
}

#[async_trait]
impl ItemRepository for ItemStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        ItemEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<Item>> {
        let items = filtered(query)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Item::try_from)
            .collect::<AppResult<Vec<Item>>>()?;

        Ok(items.into_iter().filter(|i| query.matches(i)).collect())
    }

    async fn create(&self, item: NewItem, created_by: Uuid) -> AppResult<Item> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(item.name),
            category: Set(item.category.as_str().to_string()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            description: Set(item.description),
            image_url: Set(item.image_url),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Item::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> AppResult<Option<Item>> {
        let Some(existing) = ItemEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(category) = changes.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(quantity) = changes.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Item::try_from(model).map(Some)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ItemEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn decrement_if_available(&self, id: Uuid, quantity: i32) -> AppResult<StockUpdate> {
        let result = ItemEntity::update_many()
            .col_expr(
                item::Column::Quantity,
                Expr::col(item::Column::Quantity).sub(quantity),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(item::Column::Id.eq(id))
            .filter(item::Column::Quantity.gte(quantity))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return self.classify_rejection(id).await;
        }

        tracing::debug!(item_id = %id, quantity, "Stock decremented");
        self.applied(id).await
    }

    async fn increment(&self, id: Uuid, quantity: i32) -> AppResult<StockUpdate> {
        let result = ItemEntity::update_many()
            .col_expr(
                item::Column::Quantity,
                Expr::col(item::Column::Quantity).add(quantity),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(item::Column::Id.eq(id))
            .filter(item::Column::Quantity.lte(i32::MAX - quantity))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return self.classify_rejection(id).await;
        }

        tracing::debug!(item_id = %id, quantity, "Stock incremented");
        self.applied(id).await
    }
}
