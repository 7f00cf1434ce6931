use std::env;
use std::env::VarError;
use std::str::FromStr;

use trivia_backend::config::db::DbKind;
use trivia_backend::infra::state::{build_state, StateBuilder};
use trivia_backend::state::app_state::AppState;
use trivia_backend::AppError;

/// Tests run against a private in-memory SQLite database unless
/// `TRIVIA_TEST_DB_KIND` names another kind (e.g. `postgres`).
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    match env::var("TRIVIA_TEST_DB_KIND") {
        Ok(raw) => DbKind::from_str(&raw),
        Err(VarError::NotPresent) => Ok(DbKind::SqliteMemory),
        Err(err) => Err(AppError::config(format!(
            "failed to read TRIVIA_TEST_DB_KIND: {err}"
        ))),
    }
}

pub fn test_state_builder() -> Result<StateBuilder, AppError> {
    Ok(build_state().with_db(resolve_test_db_kind()?))
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    test_state_builder()?.build().await
}
