use rust_decimal::Decimal;
use serde::Serialize;

use super::{assign_lot_meters, compute_commission, round2, to_linear_measure, AmountOverflow};
use crate::db_types::{CommissionConfig, QuantityUnit};

/// The derived fields stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderAmounts {
    pub quantity_unit: QuantityUnit,
    pub lot_meters: Option<Decimal>,
    pub meter: Decimal,
    pub commission_amount: Decimal,
}

/// Picks the lot size for an order. Meter orders have none. Otherwise an already assigned lot size is kept, and a
/// fresh one is drawn only when the order has never had one.
pub fn resolve_lot_meters(unit: QuantityUnit, existing: Option<Decimal>) -> Option<Decimal> {
    match (unit, existing) {
        (QuantityUnit::Meter, _) => None,
        (_, Some(lot_meters)) => Some(lot_meters),
        (_, None) => Some(assign_lot_meters()),
    }
}

/// Computes the stored amounts of an order from its full quantity.
///
/// This runs when an order is created, and again whenever its rate, quantity, unit or customer changes. Passing the
/// order's current `existing_lot_meters` keeps the lot size stable across recalculations, so repeated calls with the
/// same inputs give the same result.
pub fn compute_order_amounts(
    quantity: Decimal,
    rate: Decimal,
    unit: QuantityUnit,
    config: &CommissionConfig,
    existing_lot_meters: Option<Decimal>,
) -> Result<OrderAmounts, AmountOverflow> {
    let lot_meters = resolve_lot_meters(unit, existing_lot_meters).map(round2);
    let meter = to_linear_measure(quantity, unit, lot_meters)?;
    let commission_amount = compute_commission(quantity, rate, unit, lot_meters, config)?;
    let commission_amount = round2(commission_amount);
    Ok(OrderAmounts { quantity_unit: unit, lot_meters, meter: round2(meter), commission_amount })
}
