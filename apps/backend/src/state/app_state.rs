use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Shared per-process state handed to every request.
///
/// The connection pool is the only shared resource; there are no caches.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database pool (absent in DB-less unit tests)
    db: Option<DatabaseConnection>,
    /// Token signing and cookie settings
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
