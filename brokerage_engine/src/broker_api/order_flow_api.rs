use std::{collections::HashMap, fmt::Debug};

use log::*;

use crate::{
    broker_api::{
        errors::OrderFlowError,
        order_objects::{
            validate_new_order,
            validate_update,
            ModifyOrderRequest,
            NewOrderRequest,
            OrderQueryFilter,
            OrderView,
        },
    },
    db_types::{CommissionConfig, NewOrder, Order, OrderUpdate},
    traits::{AccountManagement, BrokerageDatabase, BrokerageDbError},
};

/// `OrderFlowApi` is the primary API for creating orders and moving them through their lifecycle.
///
/// Input is validated here, before the backend is touched. Everything else (reference checks, amount calculation,
/// commission finalization and the sequence number) happens inside a single backend transaction.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: BrokerageDatabase
{
    /// Validates and submits a caller's order creation request. Returns the view of the stored order.
    pub async fn create_order(&self, account_id: i64, request: NewOrderRequest) -> Result<OrderView, OrderFlowError> {
        let order = NewOrder::try_from(request)?;
        let order = self.process_new_order(account_id, order).await?;
        self.order_view(account_id, order).await
    }

    /// Submit a new order. The order is stored as `PENDING` with the next sequence number for the account, and its
    /// amounts calculated from the full quantity.
    ///
    /// If the customer or manufacturer does not exist for the account, nothing is stored.
    pub async fn process_new_order(&self, account_id: i64, order: NewOrder) -> Result<Order, OrderFlowError> {
        validate_new_order(&order)?;
        let order = self.db.create_order(account_id, order).await.map_err(|e| {
            warn!("🔄️📦️ Could not create order for account #{account_id}. {e}");
            OrderFlowError::from(e)
        })?;
        debug!(
            "🔄️📦️ Order #{} created for account #{account_id}. {} {} @ {}",
            order.order_no, order.quantity, order.quantity_unit, order.rate
        );
        Ok(order)
    }

    /// Validates and applies a caller's partial update. Returns the view of the updated order.
    pub async fn update_order(
        &self,
        account_id: i64,
        order_id: i64,
        request: ModifyOrderRequest,
    ) -> Result<OrderView, OrderFlowError> {
        let update = OrderUpdate::try_from(request)?;
        let order = self.modify_order(account_id, order_id, update).await?;
        self.order_view(account_id, order).await
    }

    /// Applies a partial update to an order.
    ///
    /// Changes to the rate, quantity, unit or customer recalculate the stored amounts. Completing the order, or
    /// changing the progress of a completed order, finalizes the commission from the processed quantity.
    pub async fn modify_order(
        &self,
        account_id: i64,
        order_id: i64,
        update: OrderUpdate,
    ) -> Result<Order, OrderFlowError> {
        validate_update(&update)?;
        let order = self.db.update_order(account_id, order_id, update).await.map_err(|e| {
            warn!("🔄️📦️ Could not update order {order_id} for account #{account_id}. {e}");
            OrderFlowError::from(e)
        })?;
        debug!("🔄️📦️ Order #{} is now {}. Commission: {:?}", order.order_no, order.status, order.commission_amount);
        Ok(order)
    }

    pub async fn order_by_id(&self, account_id: i64, order_id: i64) -> Result<Option<OrderView>, OrderFlowError> {
        match self.db.fetch_order(account_id, order_id).await? {
            Some(order) => Ok(Some(self.order_view(account_id, order).await?)),
            None => Ok(None),
        }
    }

    /// Fetches the orders matching the query, in sequence number order.
    pub async fn search_orders(
        &self,
        account_id: i64,
        query: OrderQueryFilter,
    ) -> Result<Vec<OrderView>, OrderFlowError> {
        let orders = self.db.search_orders(account_id, query).await?;
        let mut configs = HashMap::<i64, CommissionConfig>::new();
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let config = match configs.get(&order.customer_id) {
                Some(config) => *config,
                None => {
                    let config = self.commission_config(account_id, order.customer_id).await?;
                    configs.insert(order.customer_id, config);
                    config
                },
            };
            result.push(OrderView::new(order, &config));
        }
        trace!("🔄️📦️ {} orders found for account #{account_id}", result.len());
        Ok(result)
    }

    async fn order_view(&self, account_id: i64, order: Order) -> Result<OrderView, OrderFlowError> {
        let config = self.commission_config(account_id, order.customer_id).await?;
        Ok(OrderView::new(order, &config))
    }

    async fn commission_config(&self, account_id: i64, customer_id: i64) -> Result<CommissionConfig, OrderFlowError> {
        let customer = self
            .db
            .fetch_customer(account_id, customer_id)
            .await?
            .ok_or(BrokerageDbError::CustomerNotFound(customer_id))?;
        Ok(customer.commission)
    }
}
