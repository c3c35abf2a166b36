use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid {kind}: {value}")]
pub struct ConversionError {
    pub kind: &'static str,
    pub value: String,
}

impl ConversionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

//--------------------------------------     QuantityUnit      ---------------------------------------------------------
/// The unit an order quantity is declared in. `Takka` is a sub-unit of `Lot` (12 takka to a lot); `Meter` is the
/// common linear measure that prices and commissions are based on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuantityUnit {
    #[default]
    Takka,
    Lot,
    Meter,
}

impl QuantityUnit {
    /// Lenient conversion. Unrecognised values fall back to `Takka` rather than failing.
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Unrecognised quantity unit '{value}'. Falling back to TAKKA");
            QuantityUnit::Takka
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityUnit::Takka => "TAKKA",
            QuantityUnit::Lot => "LOT",
            QuantityUnit::Meter => "METER",
        }
    }
}

impl Display for QuantityUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuantityUnit {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TAKKA" => Ok(Self::Takka),
            "LOT" => Ok(Self::Lot),
            "METER" => Ok(Self::Meter),
            s => Err(ConversionError::new("quantity unit", s)),
        }
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been placed and is (possibly partially) being fulfilled.
    #[default]
    Pending,
    /// The order has been fulfilled. The stored commission follows the processed quantity from here on.
    Completed,
    /// The order has been cancelled by the broker.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "PENDING"),
            OrderStatusType::Completed => write!(f, "COMPLETED"),
            OrderStatusType::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    /// Status names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ConversionError::new("order status", s)),
        }
    }
}

//--------------------------------------   CommissionConfig    ---------------------------------------------------------
pub const DEFAULT_COMMISSION_PERCENT: Decimal = Decimal::ONE;

/// How a customer's commission is computed. Attached per customer, and snapshotted by every amount calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "UPPERCASE")]
pub enum CommissionConfig {
    /// A percentage of the order value (meters × rate, plus GST).
    Percent { percent: Decimal },
    /// A flat amount for every unit of quantity, independent of rate.
    Lot { rate: Decimal },
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self::Percent { percent: DEFAULT_COMMISSION_PERCENT }
    }
}

impl CommissionConfig {
    /// Builds the configuration from the loosely typed customer columns.
    ///
    /// * A missing or unknown basis is treated as `PERCENT`.
    /// * A missing or non-positive percentage defaults to 1%.
    /// * A `LOT` basis without a rate yields a zero rate, and hence zero commission.
    pub fn from_columns(basis: Option<&str>, percent: Option<Decimal>, lot_rate: Option<Decimal>) -> Self {
        let basis = basis.map(|b| b.trim().to_uppercase()).unwrap_or_default();
        if basis == "LOT" {
            let rate = lot_rate.unwrap_or_else(|| {
                warn!("Customer commission basis is LOT, but no lot rate is configured. Using 0");
                Decimal::ZERO
            });
            return Self::Lot { rate };
        }
        let percent = percent.filter(|p| *p > Decimal::ZERO).unwrap_or(DEFAULT_COMMISSION_PERCENT);
        Self::Percent { percent }
    }

    pub fn basis(&self) -> &'static str {
        match self {
            CommissionConfig::Percent { .. } => "PERCENT",
            CommissionConfig::Lot { .. } => "LOT",
        }
    }

    pub fn percent(&self) -> Option<Decimal> {
        match self {
            CommissionConfig::Percent { percent } => Some(*percent),
            CommissionConfig::Lot { .. } => None,
        }
    }

    pub fn lot_rate(&self) -> Option<Decimal> {
        match self {
            CommissionConfig::Percent { .. } => None,
            CommissionConfig::Lot { rate } => Some(*rate),
        }
    }
}

//--------------------------------------        Account        ---------------------------------------------------------
/// The broker account that owns customers, manufacturers, qualities and orders.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub order_counter: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Customer        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub gst_no: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub commission: CommissionConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub gst_no: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub commission: CommissionConfig,
}

impl NewCustomer {
    pub fn new<S: Into<String>>(name: S, commission: CommissionConfig) -> Self {
        Self {
            name: name.into(),
            gst_no: String::default(),
            address: String::default(),
            phone: String::default(),
            email: None,
            commission,
        }
    }

    pub fn with_contact_details(mut self, gst_no: &str, address: &str, phone: &str) -> Self {
        self.gst_no = gst_no.to_string();
        self.address = address.to_string();
        self.phone = phone.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

//--------------------------------------     Manufacturer      ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Manufacturer {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    /// The display (firm) name. Editable through an order update.
    pub firm_name: Option<String>,
    pub gst_no: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewManufacturer {
    pub name: String,
    pub firm_name: Option<String>,
    pub gst_no: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
}

impl NewManufacturer {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_firm_name(mut self, firm_name: &str) -> Self {
        self.firm_name = Some(firm_name.to_string());
        self
    }
}

//--------------------------------------        Quality        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Quality {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub account_id: i64,
    /// The per-account sequence number.
    pub order_no: i64,
    pub customer_id: i64,
    pub manufacturer_id: i64,
    pub quality_id: i64,
    pub rate: Decimal,
    pub quantity: Decimal,
    pub quantity_unit: QuantityUnit,
    /// Meters per lot. Assigned once, when the order first has a non-meter unit. `None` iff the unit is `Meter`.
    pub lot_meters: Option<Decimal>,
    pub meter: Decimal,
    pub processed_quantity: i64,
    pub commission_amount: Option<Decimal>,
    pub status: OrderStatusType,
    pub payment_due_days: Option<i64>,
    pub remarks: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
/// A validated order creation request. The references have not been resolved yet; the database backend does that
/// inside the same transaction that writes the order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub manufacturer_id: i64,
    pub quality_name: String,
    pub rate: Decimal,
    pub quantity: Decimal,
    pub quantity_unit: QuantityUnit,
    pub order_date: DateTime<Utc>,
    pub remarks: Option<String>,
    pub payment_due_days: Option<i64>,
}

impl NewOrder {
    pub fn new(customer_id: i64, manufacturer_id: i64, quality_name: &str, rate: Decimal, quantity: Decimal) -> Self {
        Self {
            customer_id,
            manufacturer_id,
            quality_name: quality_name.to_string(),
            rate,
            quantity,
            quantity_unit: QuantityUnit::default(),
            order_date: Utc::now(),
            remarks: None,
            payment_due_days: None,
        }
    }

    pub fn with_unit(mut self, unit: QuantityUnit) -> Self {
        self.quantity_unit = unit;
        self
    }

    pub fn with_order_date(mut self, order_date: DateTime<Utc>) -> Self {
        self.order_date = order_date;
        self
    }

    pub fn with_remarks(mut self, remarks: &str) -> Self {
        self.remarks = Some(remarks.to_string());
        self
    }

    pub fn with_payment_due_days(mut self, days: i64) -> Self {
        self.payment_due_days = Some(days);
        self
    }
}

//--------------------------------------  ProcessedQuantity    ---------------------------------------------------------
/// A change to an order's fulfilment progress. Absolute and relative changes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessedQuantityChange {
    Set(i64),
    Add(i64),
}

impl ProcessedQuantityChange {
    /// The processed quantity after the change. `None` if an increment overflows.
    pub fn apply(&self, current: i64) -> Option<i64> {
        match self {
            ProcessedQuantityChange::Set(value) => Some(*value),
            ProcessedQuantityChange::Add(delta) => current.checked_add(*delta),
        }
    }
}

//--------------------------------------      OrderUpdate      ---------------------------------------------------------
/// A validated, partial update of an order. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub customer_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub quality_name: Option<String>,
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub quantity_unit: Option<QuantityUnit>,
    pub order_date: Option<DateTime<Utc>>,
    /// `Some(None)` clears the remarks.
    pub remarks: Option<Option<String>>,
    /// `Some(None)` clears the payment terms.
    pub payment_due_days: Option<Option<i64>>,
    pub processed_quantity: Option<ProcessedQuantityChange>,
    pub status: Option<OrderStatusType>,
    /// Renames the firm of the manufacturer currently linked to the order. `Some(None)` clears it.
    pub manufacturer_display_name: Option<Option<String>>,
}

impl OrderUpdate {
    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: QuantityUnit) -> Self {
        self.quantity_unit = Some(unit);
        self
    }

    pub fn with_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_processed_quantity(mut self, change: ProcessedQuantityChange) -> Self {
        self.processed_quantity = Some(change);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() &&
            self.manufacturer_id.is_none() &&
            self.quality_name.is_none() &&
            self.rate.is_none() &&
            self.quantity.is_none() &&
            self.quantity_unit.is_none() &&
            self.order_date.is_none() &&
            self.remarks.is_none() &&
            self.payment_due_days.is_none() &&
            self.processed_quantity.is_none() &&
            self.status.is_none() &&
            self.manufacturer_display_name.is_none()
    }

    /// True if any of the inputs that the stored amounts depend on are part of this update.
    pub fn affects_amounts(&self) -> bool {
        self.rate.is_some() || self.quantity.is_some() || self.quantity_unit.is_some() || self.customer_id.is_some()
    }
}
