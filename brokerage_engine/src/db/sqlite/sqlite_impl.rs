//! `SqliteDatabase` is a concrete implementation of a brokerage engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{accounts, customers, manufacturers, new_pool, orders, qualities};
use crate::{
    config::EngineConfig,
    db_types::{Account, Customer, Manufacturer, NewCustomer, NewManufacturer, NewOrder, Order, OrderUpdate, Quality},
    lifecycle::{apply_update, ResolvedReferences},
    order_objects::OrderQueryFilter,
    pricing::compute_order_amounts,
    traits::{AccountManagement, BrokerageDatabase, BrokerageDbError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the connection settings in `config`.
    pub async fn new(config: &EngineConfig) -> Result<Self, BrokerageDbError> {
        Self::new_with_url(&config.database_url, config.max_connections).await
    }

    /// Connects to the database at `url`, creating the file if necessary, and brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, BrokerageDbError> {
        let pool = new_pool(url, max_connections).await?;
        let db = Self { url: url.to_string(), pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<(), BrokerageDbError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl BrokerageDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_order(&self, account_id: i64, order: NewOrder) -> Result<Order, BrokerageDbError> {
        let mut tx = self.pool.begin().await?;
        // Taking the sequence number first also takes the write lock for the rest of the transaction.
        let order_no = accounts::next_order_number(account_id, &mut tx)
            .await?
            .ok_or(BrokerageDbError::AccountNotFound(account_id))?;
        let customer = customers::fetch_customer(account_id, order.customer_id, &mut tx)
            .await?
            .ok_or(BrokerageDbError::CustomerNotFound(order.customer_id))?;
        manufacturers::fetch_manufacturer(account_id, order.manufacturer_id, &mut tx)
            .await?
            .ok_or(BrokerageDbError::ManufacturerNotFound(order.manufacturer_id))?;
        let quality = qualities::fetch_or_create_quality(account_id, &order.quality_name, &mut tx).await?;
        let amounts =
            compute_order_amounts(order.quantity, order.rate, order.quantity_unit, &customer.commission, None)?;
        let order = orders::insert_order(account_id, order_no, quality.id, &order, &amounts, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Order #{order_no} for account #{account_id} saved with id {}. {} {} = {}m, commission {}",
            order.id, order.quantity, order.quantity_unit, order.meter, amounts.commission_amount
        );
        Ok(order)
    }

    async fn update_order(
        &self,
        account_id: i64,
        order_id: i64,
        update: OrderUpdate,
    ) -> Result<Order, BrokerageDbError> {
        let mut tx = self.pool.begin().await?;
        if !orders::touch_order(account_id, order_id, &mut tx).await? {
            return Err(BrokerageDbError::OrderNotFound(order_id));
        }
        let existing = orders::fetch_order(account_id, order_id, &mut tx)
            .await?
            .ok_or(BrokerageDbError::OrderNotFound(order_id))?;
        let customer_id = update.customer_id.unwrap_or(existing.customer_id);
        let customer = customers::fetch_customer(account_id, customer_id, &mut tx)
            .await?
            .ok_or(BrokerageDbError::CustomerNotFound(customer_id))?;
        if let Some(manufacturer_id) = update.manufacturer_id {
            manufacturers::fetch_manufacturer(account_id, manufacturer_id, &mut tx)
                .await?
                .ok_or(BrokerageDbError::ManufacturerNotFound(manufacturer_id))?;
        }
        if let Some(firm_name) = &update.manufacturer_display_name {
            manufacturers::update_firm_name(existing.manufacturer_id, firm_name.as_deref(), &mut tx).await?;
        }
        let quality_id = match &update.quality_name {
            Some(name) => Some(qualities::fetch_or_create_quality(account_id, name, &mut tx).await?.id),
            None => None,
        };
        trace!("🗃️ Order #{} updating with new values: {update:?}", existing.order_no);
        let updated = apply_update(&existing, &update, ResolvedReferences { quality_id }, &customer.commission)?;
        let order = orders::save_order(&updated, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Order #{} updated. Status {}, processed {} of {} {}, commission {:?}",
            order.order_no,
            order.status,
            order.processed_quantity,
            order.quantity,
            order.quantity_unit,
            order.commission_amount
        );
        Ok(order)
    }

    async fn fetch_order(&self, account_id: i64, order_id: i64) -> Result<Option<Order>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(account_id, order_id, &mut conn).await?;
        Ok(order)
    }

    async fn search_orders(&self, account_id: i64, query: OrderQueryFilter) -> Result<Vec<Order>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        trace!("🗃️ Searching orders for account #{account_id}. {query}");
        let orders = orders::search_orders(account_id, query, &mut conn).await?;
        Ok(orders)
    }

    async fn close(&mut self) -> Result<(), BrokerageDbError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_account(&self, name: &str) -> Result<Account, BrokerageDbError> {
        let mut tx = self.pool.begin().await?;
        let account = accounts::insert_account(name, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Account #{} created for {name}", account.id);
        Ok(account)
    }

    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::fetch_account(account_id, &mut conn).await?;
        Ok(account)
    }

    async fn insert_customer(&self, account_id: i64, customer: NewCustomer) -> Result<Customer, BrokerageDbError> {
        let mut tx = self.pool.begin().await?;
        accounts::fetch_account(account_id, &mut tx).await?.ok_or(BrokerageDbError::AccountNotFound(account_id))?;
        let customer = customers::insert_customer(account_id, customer, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Customer #{} created for account #{account_id}. {:?}", customer.id, customer.commission);
        Ok(customer)
    }

    async fn fetch_customer(&self, account_id: i64, customer_id: i64) -> Result<Option<Customer>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer(account_id, customer_id, &mut conn).await?;
        Ok(customer)
    }

    async fn insert_manufacturer(
        &self,
        account_id: i64,
        manufacturer: NewManufacturer,
    ) -> Result<Manufacturer, BrokerageDbError> {
        let mut tx = self.pool.begin().await?;
        accounts::fetch_account(account_id, &mut tx).await?.ok_or(BrokerageDbError::AccountNotFound(account_id))?;
        let manufacturer = manufacturers::insert_manufacturer(account_id, manufacturer, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Manufacturer #{} created for account #{account_id}", manufacturer.id);
        Ok(manufacturer)
    }

    async fn fetch_manufacturer(
        &self,
        account_id: i64,
        manufacturer_id: i64,
    ) -> Result<Option<Manufacturer>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        let manufacturer = manufacturers::fetch_manufacturer(account_id, manufacturer_id, &mut conn).await?;
        Ok(manufacturer)
    }

    async fn fetch_quality_by_name(&self, account_id: i64, name: &str) -> Result<Option<Quality>, BrokerageDbError> {
        let mut conn = self.pool.acquire().await?;
        let quality = qualities::fetch_quality_by_name(account_id, name, &mut conn).await?;
        Ok(quality)
    }
}
