//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - The `files` entity definition
//! - [`FileRepository`], the catalog behind the lifecycle service
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use migration::Migrator;
pub use repositories::FileRepository;

use filekeep_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::debug!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "Database connected"
    );
    Ok(db)
}
