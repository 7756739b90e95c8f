use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::{config::AppConfig, migration::Migrator};

/// Create a SeaORM connection.
pub async fn create_orm_conn(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    // An in-memory sqlite database lives and dies with a single connection.
    if config.database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    } else if let Some(max) = config.max_connections {
        options.max_connections(max);
    }
    options.sqlx_logging(true);

    let conn = Database::connect(options).await?;
    tracing::debug!(backend = ?conn.get_database_backend(), "database connected");
    Ok(conn)
}

/// Apply every pending schema migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
