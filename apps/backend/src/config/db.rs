use std::str::FromStr;

use crate::config::env::{must_var_from, var_from};
use crate::error::AppError;

/// Which database engine a process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// PostgreSQL (production)
    Postgres,
    /// SQLite database file, handy for local runs
    SqliteFile,
    /// Private in-memory SQLite, used by tests
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "sqlite" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!("unknown database kind '{other}'"))),
        }
    }
}

/// Database URL for `kind`, read from the process environment.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    db_url_from(kind, |name| std::env::var(name).ok())
}

/// Database URL for `kind` using `lookup` for variables.
///
/// `DATABASE_URL` wins for Postgres; otherwise the URL is assembled from
/// `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`
/// and `POSTGRES_DB`. SQLite files come from `SQLITE_PATH`.
pub fn db_url_from<F>(kind: DbKind, lookup: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match kind {
        DbKind::Postgres => {
            if let Some(url) = var_from(&lookup, "DATABASE_URL") {
                return Ok(url);
            }
            let host = var_from(&lookup, "POSTGRES_HOST").unwrap_or_else(|| "localhost".into());
            let port = var_from(&lookup, "POSTGRES_PORT").unwrap_or_else(|| "5432".into());
            let user = must_var_from(&lookup, "POSTGRES_USER")?;
            let password = must_var_from(&lookup, "POSTGRES_PASSWORD")?;
            let db_name = must_var_from(&lookup, "POSTGRES_DB")?;
            Ok(format!(
                "postgresql://{user}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = var_from(&lookup, "SQLITE_PATH").unwrap_or_else(|| "trivia.sqlite".into());
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}
