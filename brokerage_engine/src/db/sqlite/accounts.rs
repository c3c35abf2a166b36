use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::Account;

/// Inserts a new account. Run it inside a transaction and commit, otherwise the row may not be visible to other
/// pooled connections.
pub async fn insert_account(name: &str, conn: &mut SqliteConnection) -> Result<Account, sqlx::Error> {
    let account =
        sqlx::query_as("INSERT INTO accounts (name) VALUES ($1) RETURNING *").bind(name).fetch_one(conn).await?;
    Ok(account)
}

pub async fn fetch_account(account_id: i64, conn: &mut SqliteConnection) -> Result<Option<Account>, sqlx::Error> {
    let account =
        sqlx::query_as("SELECT * FROM accounts WHERE id = $1").bind(account_id).fetch_optional(conn).await?;
    Ok(account)
}

/// Increments the account's order counter and returns the new value, which is the sequence number of the next order.
/// Returns `None` if the account does not exist.
///
/// Run this inside the transaction that inserts the order, so that a rollback releases the number again. Since it is
/// a write, it also takes SQLite's write lock, serialising concurrent order creation.
pub async fn next_order_number(account_id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let order_no: Option<i64> = sqlx::query_scalar(
        r#"
            UPDATE accounts
            SET order_counter = order_counter + 1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING order_counter
        "#,
    )
    .bind(account_id)
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Account #{account_id} order counter is now {order_no:?}");
    Ok(order_no)
}
