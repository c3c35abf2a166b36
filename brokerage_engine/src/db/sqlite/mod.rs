//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction as
//! the need arises and call through to the functions without any other changes.
//!
//! Decimal values are stored as TEXT, since SQLite has no exact numeric type.
use std::{str::FromStr, time::Duration};

use rust_decimal::Decimal;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Error as SqlxError,
    Row,
    SqlitePool,
};

pub mod accounts;
pub mod customers;
pub mod manufacturers;
pub mod orders;
pub mod qualities;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;

/// How long a writer waits for a competing transaction to release the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, SqlxError> {
    let value: String = row.try_get(column)?;
    parse_decimal(column, &value)
}

pub(crate) fn optional_decimal_column(row: &SqliteRow, column: &str) -> Result<Option<Decimal>, SqlxError> {
    let value: Option<String> = row.try_get(column)?;
    value.map(|v| parse_decimal(column, &v)).transpose()
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, SqlxError> {
    Decimal::from_str(value).map_err(|e| SqlxError::ColumnDecode { index: column.to_string(), source: Box::new(e) })
}
