use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    db::traits::AccountManagement,
    db_types::{NewOrder, Order, OrderUpdate},
    order_objects::OrderQueryFilter,
    pricing::AmountOverflow,
};

/// This trait defines the order workflow behaviour for backends supporting the brokerage engine.
///
/// Every mutating call is a single all-or-nothing unit of work. If any reference fails to resolve, nothing is
/// written: no order, no quality, and no order sequence number is consumed.
#[allow(async_fn_in_trait)]
pub trait BrokerageDatabase: Clone + AccountManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Takes a new order, and in a single atomic transaction,
    /// * allocates the next sequence number from the account's order counter,
    /// * checks that the customer and manufacturer exist for the account,
    /// * fetches the quality by name, creating it if it is new to the account,
    /// * computes the order amounts using the customer's commission configuration, and
    /// * stores the order with a `PENDING` status.
    ///
    /// Amounts too large to compute fail with [`BrokerageDbError::AmountOverflow`], and nothing is stored.
    ///
    /// Returns the newly stored order.
    async fn create_order(&self, account_id: i64, order: NewOrder) -> Result<Order, BrokerageDbError>;

    /// Applies the update to the order in a single atomic transaction. Any new customer or manufacturer must exist
    /// for the account, and a new quality name is fetched or created. Amounts are recalculated, and the commission
    /// finalized, according to the rules in [`crate::lifecycle`].
    ///
    /// A manufacturer display name in the update renames the firm of the manufacturer the order was linked to before
    /// the update.
    ///
    /// Returns the updated order.
    async fn update_order(&self, account_id: i64, order_id: i64, update: OrderUpdate)
        -> Result<Order, BrokerageDbError>;

    /// Fetches the order with the given id, if it belongs to the account.
    async fn fetch_order(&self, account_id: i64, order_id: i64) -> Result<Option<Order>, BrokerageDbError>;

    /// Fetches the account's orders matching the filter, ordered by sequence number.
    async fn search_orders(&self, account_id: i64, query: OrderQueryFilter) -> Result<Vec<Order>, BrokerageDbError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), BrokerageDbError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum BrokerageDbError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("The requested account id {0} does not exist")]
    AccountNotFound(i64),
    #[error("The requested customer id {0} does not exist")]
    CustomerNotFound(i64),
    #[error("The requested manufacturer id {0} does not exist")]
    ManufacturerNotFound(i64),
    #[error("The requested order id {0} does not exist")]
    OrderNotFound(i64),
    #[error("The value already exists. {0}")]
    UniqueViolation(String),
    #[error("Stored data could not be interpreted. {0}")]
    InvalidData(String),
    #[error("{0}")]
    AmountOverflow(#[from] AmountOverflow),
}

impl From<sqlx::Error> for BrokerageDbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                BrokerageDbError::UniqueViolation(db_err.message().to_string())
            },
            sqlx::Error::ColumnDecode { index, source } => {
                BrokerageDbError::InvalidData(format!("Column {index}: {source}"))
            },
            _ => BrokerageDbError::DatabaseError(e.to_string()),
        }
    }
}

impl From<MigrateError> for BrokerageDbError {
    fn from(e: MigrateError) -> Self {
        BrokerageDbError::DatabaseError(format!("Migration failed. {e}"))
    }
}
