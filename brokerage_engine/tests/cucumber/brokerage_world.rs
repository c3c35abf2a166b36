use std::collections::HashMap;

use brokerage_engine::{
    order_objects::OrderView,
    AccountApi,
    OrderFlowApi,
    OrderFlowError,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

use crate::support::prepare_env::prepare_test_env;

#[derive(Default, Debug, World)]
pub struct BrokerageWorld {
    pub system: Option<BrokerageSystem>,
    pub account_id: Option<i64>,
    pub customers: HashMap<String, i64>,
    pub manufacturers: HashMap<String, i64>,
    /// The order as it was before the most recent successful call
    pub previous_order: Option<OrderView>,
    pub last_order: Option<OrderView>,
    pub last_error: Option<OrderFlowError>,
}

#[derive(Debug)]
pub struct BrokerageSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub orders: OrderFlowApi<SqliteDatabase>,
    pub accounts: AccountApi<SqliteDatabase>,
}

impl BrokerageWorld {
    pub fn system(&self) -> &BrokerageSystem {
        self.system.as_ref().expect("Brokerage system not initialised")
    }

    pub fn orders(&self) -> &OrderFlowApi<SqliteDatabase> {
        &self.system().orders
    }

    pub fn accounts(&self) -> &AccountApi<SqliteDatabase> {
        &self.system().accounts
    }

    pub fn account_id(&self) -> i64 {
        self.account_id.expect("No broker account has been created")
    }

    pub fn customer_id(&self, name: &str) -> i64 {
        *self.customers.get(name).unwrap_or_else(|| panic!("Unknown customer {name}"))
    }

    pub fn manufacturer_id(&self, name: &str) -> i64 {
        *self.manufacturers.get(name).unwrap_or_else(|| panic!("Unknown manufacturer {name}"))
    }

    pub fn last_order(&self) -> &OrderView {
        match (&self.last_order, &self.last_error) {
            (_, Some(e)) => panic!("The last request failed: {e}"),
            (Some(order), None) => order,
            (None, None) => panic!("No order has been returned"),
        }
    }

    /// Records the outcome of an order call.
    pub fn record(&mut self, result: Result<OrderView, OrderFlowError>) {
        match result {
            Ok(order) => {
                self.previous_order = self.last_order.take();
                self.last_order = Some(order);
                self.last_error = None;
            },
            Err(e) => {
                debug!("🚀️ Order call failed: {e}");
                self.last_error = Some(e);
            },
        }
    }
}

impl BrokerageSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("🚀️ Created database: {url}");
        let orders = OrderFlowApi::new(db.clone());
        let accounts = AccountApi::new(db.clone());
        Self { db_path: url, db, orders, accounts }
    }
}
