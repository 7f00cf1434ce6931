use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

/// Open a pool for `kind`. Does not run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    // Every connection to `sqlite::memory:` opens its own empty database,
    // so the pool must hold exactly one.
    if kind == DbKind::SqliteMemory {
        options.max_connections(1).min_connections(1);
    }

    Database::connect(options)
        .await
        .map_err(|e| AppError::config(format!("failed to connect to {kind:?} database: {e}")))
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migrations failed: {e}")))?;
    info!(db_kind = ?kind, "database ready");
    Ok(conn)
}
