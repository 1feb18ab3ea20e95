//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Account, Role};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    /// Normalized (trimmed, lowercased) email
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity; an unknown stored role is corruption.
impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model.role.parse().map_err(|_| {
            AppError::internal(format!(
                "Account {} has unknown role '{}'",
                model.id, model.role
            ))
        })?;

        Ok(Account {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
