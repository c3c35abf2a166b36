//! Unifies API for managing broker accounts and the parties their orders refer to.

use std::fmt::Debug;

use log::*;
use rust_decimal::Decimal;

use crate::{
    broker_api::errors::OrderFlowError,
    db_types::{Account, CommissionConfig, Customer, Manufacturer, NewCustomer, NewManufacturer, Quality},
    traits::AccountManagement,
};

/// The `AccountApi` provides a unified API for accessing accounts, customers, manufacturers and qualities.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create_account(&self, name: &str) -> Result<Account, OrderFlowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrderFlowError::validation("account name is required"));
        }
        let account = self.db.create_account(name).await?;
        info!("Broker account #{} created for {name}", account.id);
        Ok(account)
    }

    /// Fetches the account for the given account id. If no account exists, `None` is returned.
    pub async fn account_by_id(&self, account_id: i64) -> Result<Option<Account>, OrderFlowError> {
        Ok(self.db.fetch_account(account_id).await?)
    }

    /// Registers a customer with the account. A `LOT` basis needs a positive lot rate, and a `PERCENT` basis a
    /// positive percentage.
    pub async fn register_customer(&self, account_id: i64, customer: NewCustomer) -> Result<Customer, OrderFlowError> {
        if customer.name.trim().is_empty() {
            return Err(OrderFlowError::validation("customer name is required"));
        }
        validate_commission_config(&customer.commission)?;
        Ok(self.db.insert_customer(account_id, customer).await?)
    }

    pub async fn customer_by_id(&self, account_id: i64, customer_id: i64) -> Result<Option<Customer>, OrderFlowError> {
        Ok(self.db.fetch_customer(account_id, customer_id).await?)
    }

    pub async fn register_manufacturer(
        &self,
        account_id: i64,
        manufacturer: NewManufacturer,
    ) -> Result<Manufacturer, OrderFlowError> {
        if manufacturer.name.trim().is_empty() {
            return Err(OrderFlowError::validation("manufacturer name is required"));
        }
        Ok(self.db.insert_manufacturer(account_id, manufacturer).await?)
    }

    pub async fn manufacturer_by_id(
        &self,
        account_id: i64,
        manufacturer_id: i64,
    ) -> Result<Option<Manufacturer>, OrderFlowError> {
        Ok(self.db.fetch_manufacturer(account_id, manufacturer_id).await?)
    }

    pub async fn quality_by_name(&self, account_id: i64, name: &str) -> Result<Option<Quality>, OrderFlowError> {
        Ok(self.db.fetch_quality_by_name(account_id, name).await?)
    }
}

pub fn validate_commission_config(config: &CommissionConfig) -> Result<(), OrderFlowError> {
    match config {
        CommissionConfig::Lot { rate } if *rate <= Decimal::ZERO => {
            Err(OrderFlowError::validation("commissionLotRate must be greater than 0 for LOT commission"))
        },
        CommissionConfig::Percent { percent } if *percent <= Decimal::ZERO => {
            Err(OrderFlowError::validation("commissionPercent must be greater than 0"))
        },
        _ => Ok(()),
    }
}
