//! Migration: Create items table.
//!
//! `created_by` deliberately has no foreign key to `accounts`: removing an
//! account must never remove or block the items it created.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Items::Price).double().not_null())
                    .col(
                        ColumnDef::new(Items::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Items::Quantity).gte(0)),
                    )
                    .col(ColumnDef::new(Items::Description).text().null())
                    .col(ColumnDef::new(Items::ImageUrl).string().null())
                    .col(ColumnDef::new(Items::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Catalog listings are always newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_items_created_at")
                    .table(Items::Table)
                    .col(Items::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_items_created_at")
                    .table(Items::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Name,
    Category,
    Price,
    Quantity,
    Description,
    ImageUrl,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
