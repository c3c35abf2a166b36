use crate::{
    db::traits::BrokerageDbError,
    db_types::{Account, Customer, Manufacturer, NewCustomer, NewManufacturer, Quality},
};

/// The `AccountManagement` trait defines behaviour for managing broker accounts and the customers, manufacturers and
/// qualities that belong to them. Every lookup is scoped to an account: a customer of another account is reported as
/// missing.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates a new broker account with an order counter of zero.
    async fn create_account(&self, name: &str) -> Result<Account, BrokerageDbError>;

    /// Fetches the account with the given id. If no account exists, `None` is returned.
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, BrokerageDbError>;

    async fn insert_customer(&self, account_id: i64, customer: NewCustomer) -> Result<Customer, BrokerageDbError>;

    async fn fetch_customer(&self, account_id: i64, customer_id: i64) -> Result<Option<Customer>, BrokerageDbError>;

    async fn insert_manufacturer(
        &self,
        account_id: i64,
        manufacturer: NewManufacturer,
    ) -> Result<Manufacturer, BrokerageDbError>;

    async fn fetch_manufacturer(
        &self,
        account_id: i64,
        manufacturer_id: i64,
    ) -> Result<Option<Manufacturer>, BrokerageDbError>;

    /// Fetches a quality by its (trimmed) name.
    async fn fetch_quality_by_name(&self, account_id: i64, name: &str) -> Result<Option<Quality>, BrokerageDbError>;
}
