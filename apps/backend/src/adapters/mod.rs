//! SeaORM adapters. Functions are generic over `ConnectionTrait` and return
//! `DbErr`; repos map errors to `DomainError`.

pub mod answers_sea;
pub mod game_users_sea;
pub mod games_sea;
pub mod invites_sea;
pub mod templates_sea;
pub mod users_sea;

use sea_orm::sea_query::InsertStatement;
use sea_orm::ConnectionTrait;

/// Run a prebuilt insert and report how many rows it touched.
pub async fn exec_insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    stmt: &InsertStatement,
) -> Result<u64, sea_orm::DbErr> {
    let backend = conn.get_database_backend();
    let result = conn.execute(backend.build(stmt)).await?;
    Ok(result.rows_affected())
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` substring pattern.
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
