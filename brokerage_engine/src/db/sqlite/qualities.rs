use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::Quality;

pub async fn fetch_quality_by_name(
    account_id: i64,
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Quality>, sqlx::Error> {
    let quality = sqlx::query_as("SELECT id, account_id, name FROM qualities WHERE account_id = $1 AND name = $2")
        .bind(account_id)
        .bind(name.trim())
        .fetch_optional(conn)
        .await?;
    Ok(quality)
}

/// Fetches the quality with the given name, creating it if the account has not used the name before.
///
/// Names are unique per account. If a concurrent transaction creates the same name first, the insert fails with a
/// unique constraint violation, which callers report as a conflict.
pub async fn fetch_or_create_quality(
    account_id: i64,
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<Quality, sqlx::Error> {
    let name = name.trim();
    if let Some(quality) = fetch_quality_by_name(account_id, name, conn).await? {
        return Ok(quality);
    }
    let quality: Quality =
        sqlx::query_as("INSERT INTO qualities (account_id, name) VALUES ($1, $2) RETURNING id, account_id, name")
            .bind(account_id)
            .bind(name)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ New quality '{}' created for account #{account_id} with id {}", quality.name, quality.id);
    Ok(quality)
}
