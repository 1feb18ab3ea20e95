//! Item database entity for SeaORM.
//!
//! `created_by` is a plain account id column: no relation, no foreign key.

use sea_orm::entity::prelude::*;

use crate::domain::{Category, Item};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Item {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category: Category = model.category.parse().map_err(|_| {
            AppError::internal(format!(
                "Item {} has unknown category '{}'",
                model.id, model.category
            ))
        })?;

        Ok(Item {
            id: model.id,
            name: model.name,
            category,
            price: model.price,
            quantity: model.quantity,
            description: model.description,
            image_url: model.image_url,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
