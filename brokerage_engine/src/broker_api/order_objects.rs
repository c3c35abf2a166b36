use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    broker_api::errors::OrderFlowError,
    db_types::{CommissionConfig, NewOrder, Order, OrderStatusType, OrderUpdate, ProcessedQuantityChange, QuantityUnit},
    helpers::{double_option, parse_order_date},
    lifecycle::progress_commission,
};

//--------------------------------------   OrderQueryFilter    ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub customer_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub quality_id: Option<i64>,
    pub statuses: Option<Vec<OrderStatusType>>,
    /// Inclusive lower bound on the order date
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the order date
    pub until: Option<DateTime<Utc>>,
}

impl OrderQueryFilter {
    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_manufacturer_id(mut self, manufacturer_id: i64) -> Self {
        self.manufacturer_id = Some(manufacturer_id);
        self
    }

    pub fn with_quality_id(mut self, quality_id: i64) -> Self {
        self.quality_id = Some(quality_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.statuses.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() &&
            self.manufacturer_id.is_none() &&
            self.quality_id.is_none() &&
            self.statuses.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(customer_id) = &self.customer_id {
            write!(f, "customer_id: {customer_id}. ")?;
        }
        if let Some(manufacturer_id) = &self.manufacturer_id {
            write!(f, "manufacturer_id: {manufacturer_id}. ")?;
        }
        if let Some(quality_id) = &self.quality_id {
            write!(f, "quality_id: {quality_id}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        if let Some(statuses) = &self.statuses {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        Ok(())
    }
}

//--------------------------------------    NewOrderRequest    ---------------------------------------------------------
/// An order creation request as submitted by a caller. Nothing has been checked yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub customer_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub quantity_unit: Option<String>,
    pub quality_name: Option<String>,
    pub order_date: Option<String>,
    pub remarks: Option<String>,
    pub payment_due_days: Option<i64>,
}

impl TryFrom<NewOrderRequest> for NewOrder {
    type Error = OrderFlowError;

    fn try_from(req: NewOrderRequest) -> Result<Self, Self::Error> {
        let (Some(customer_id), Some(manufacturer_id), Some(rate), Some(quantity), Some(order_date)) =
            (req.customer_id, req.manufacturer_id, req.rate, req.quantity, req.order_date)
        else {
            return Err(OrderFlowError::validation("customerId, manufacturerId, rate, quantity, orderDate are required"));
        };
        let quantity_unit = match req.quantity_unit {
            Some(unit) => unit.parse::<QuantityUnit>().map_err(|_| unit_error())?,
            None => QuantityUnit::default(),
        };
        let quality_name = req.quality_name.unwrap_or_default();
        let order = NewOrder {
            customer_id,
            manufacturer_id,
            quality_name: quality_name.trim().to_string(),
            rate,
            quantity,
            quantity_unit,
            order_date: parse_order_date(&order_date)?,
            remarks: clean_text(req.remarks),
            payment_due_days: req.payment_due_days,
        };
        validate_new_order(&order)?;
        Ok(order)
    }
}

/// Checks the values of a new order. References are not checked here; that happens in the backend.
pub fn validate_new_order(order: &NewOrder) -> Result<(), OrderFlowError> {
    if order.quantity <= Decimal::ZERO || order.rate <= Decimal::ZERO {
        return Err(OrderFlowError::validation("quantity and rate must be greater than 0"));
    }
    if order.quality_name.trim().is_empty() {
        return Err(OrderFlowError::validation("qualityName is required"));
    }
    if order.payment_due_days.is_some_and(|d| d < 0) {
        return Err(payment_days_error());
    }
    Ok(())
}

//--------------------------------------   ModifyOrderRequest  ---------------------------------------------------------
/// A partial order update as submitted by a caller. Absent fields are left unchanged. `remarks` and
/// `paymentDueDays` distinguish an absent field from an explicit `null`, which clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    pub customer_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub quantity_unit: Option<String>,
    pub quality_name: Option<String>,
    pub order_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_due_days: Option<Option<i64>>,
    pub processed_quantity: Option<i64>,
    pub processed_quantity_add: Option<i64>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option", alias = "manufacturerFirmName")]
    pub manufacturer_display_name: Option<Option<String>>,
}

impl TryFrom<ModifyOrderRequest> for OrderUpdate {
    type Error = OrderFlowError;

    fn try_from(req: ModifyOrderRequest) -> Result<Self, Self::Error> {
        let processed_quantity = match (req.processed_quantity, req.processed_quantity_add) {
            (Some(_), Some(_)) => {
                return Err(OrderFlowError::validation(
                    "provide either processedQuantity or processedQuantityAdd, not both",
                ))
            },
            (Some(value), None) => Some(ProcessedQuantityChange::Set(value)),
            (None, Some(delta)) => Some(ProcessedQuantityChange::Add(delta)),
            (None, None) => None,
        };
        let quantity_unit = req.quantity_unit.map(|u| u.parse::<QuantityUnit>().map_err(|_| unit_error())).transpose()?;
        let status = req
            .status
            .map(|s| {
                s.parse::<OrderStatusType>()
                    .map_err(|_| OrderFlowError::validation("status must be one of: PENDING, COMPLETED, CANCELLED"))
            })
            .transpose()?;
        let order_date = req.order_date.as_deref().map(parse_order_date).transpose()?;
        let update = OrderUpdate {
            customer_id: req.customer_id,
            manufacturer_id: req.manufacturer_id,
            quality_name: req.quality_name.map(|q| q.trim().to_string()),
            rate: req.rate,
            quantity: req.quantity,
            quantity_unit,
            order_date,
            remarks: req.remarks.map(clean_text),
            payment_due_days: req.payment_due_days,
            processed_quantity,
            status,
            manufacturer_display_name: req.manufacturer_display_name.map(clean_text),
        };
        validate_update(&update)?;
        Ok(update)
    }
}

/// Checks the values of an order update. At least one field must be present.
pub fn validate_update(update: &OrderUpdate) -> Result<(), OrderFlowError> {
    if update.is_empty() {
        return Err(OrderFlowError::validation("at least one field is required to update order"));
    }
    if update.quantity.is_some_and(|q| q <= Decimal::ZERO) {
        return Err(OrderFlowError::validation("quantity must be greater than 0"));
    }
    if update.rate.is_some_and(|r| r <= Decimal::ZERO) {
        return Err(OrderFlowError::validation("rate must be greater than 0"));
    }
    if update.quality_name.as_deref().is_some_and(|q| q.trim().is_empty()) {
        return Err(OrderFlowError::validation("qualityName is required"));
    }
    if update.payment_due_days.flatten().is_some_and(|d| d < 0) {
        return Err(payment_days_error());
    }
    match update.processed_quantity {
        Some(ProcessedQuantityChange::Set(v)) if v < 0 => {
            Err(OrderFlowError::validation("processedQuantity must be a whole number and cannot be negative"))
        },
        Some(ProcessedQuantityChange::Add(v)) if v < 0 => {
            Err(OrderFlowError::validation("processedQuantityAdd must be a whole number and cannot be negative"))
        },
        _ => Ok(()),
    }
}

fn unit_error() -> OrderFlowError {
    OrderFlowError::validation("quantityUnit must be one of: TAKKA, LOT, METER")
}

fn payment_days_error() -> OrderFlowError {
    OrderFlowError::validation("paymentDueDays must be a whole number of days and cannot be negative")
}

/// Trims free text. Blank text is treated as absent.
fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

//--------------------------------------       OrderView       ---------------------------------------------------------
/// The caller-facing representation of an order. Decimal values are rendered as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub order_no: i64,
    pub customer_id: i64,
    pub manufacturer_id: i64,
    pub quality_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub quantity_unit: QuantityUnit,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub lot_meters: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub meter: Decimal,
    pub processed_quantity: i64,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub commission_amount: Option<Decimal>,
    /// The commission earned on the processed quantity so far. Only present while the order is pending.
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub progress_commission_amount: Option<Decimal>,
    pub status: OrderStatusType,
    pub payment_due_days: Option<i64>,
    pub remarks: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// Builds the view of `order`, using the commission configuration of the order's customer for the progress
    /// commission.
    pub fn new(order: Order, config: &CommissionConfig) -> Self {
        let progress_commission_amount = progress_commission(&order, config);
        Self {
            id: order.id,
            order_no: order.order_no,
            customer_id: order.customer_id,
            manufacturer_id: order.manufacturer_id,
            quality_id: order.quality_id,
            rate: order.rate,
            quantity: order.quantity,
            quantity_unit: order.quantity_unit,
            lot_meters: order.lot_meters,
            meter: order.meter,
            processed_quantity: order.processed_quantity,
            commission_amount: order.commission_amount,
            progress_commission_amount,
            status: order.status,
            payment_due_days: order.payment_due_days,
            remarks: order.remarks,
            order_date: order.order_date,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
