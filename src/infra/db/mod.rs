//! Database connection and initialization.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Initialize database connection and run pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(config).await?;

        if let Err(e) = Migrator::up(&database.connection, None).await {
            tracing::error!("Failed to run migrations: {}", e);
            return Err(e);
        }

        tracing::info!("Database connected and migrations applied");

        Ok(database)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(connect_options(&config.database_url)).await?;
        Ok(Self { connection })
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Drop all tables and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

fn connect_options(url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // Every pooled connection to an in-memory SQLite database would get its own empty database
    if url.starts_with("sqlite::memory:") || url.contains("mode=memory") {
        options.max_connections(1).min_connections(1);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        Config::new("sqlite::memory:", "test-secret-key-that-is-long-enough").unwrap()
    }

    #[tokio::test]
    async fn test_connect_applies_all_migrations() {
        let db = Database::connect(&memory_config()).await.unwrap();

        let status = db.migration_status().await.unwrap();
        assert_eq!(status.len(), 2);
        assert!(status.iter().all(|(_, applied)| *applied));
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_rollback_then_reapply() {
        let db = Database::connect(&memory_config()).await.unwrap();

        db.rollback_migration().await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert_eq!(status.iter().filter(|(_, applied)| *applied).count(), 1);

        db.run_migrations().await.unwrap();
        let status = db.migration_status().await.unwrap();
        assert!(status.iter().all(|(_, applied)| *applied));
    }
}
