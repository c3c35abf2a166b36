use rust_decimal::Decimal;

use super::{checked_product, round2, to_linear_measure, AmountOverflow};
use crate::db_types::{CommissionConfig, QuantityUnit};

/// GST surcharge applied on top of the order value before the commission percentage is taken.
pub const GST_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes the commission owed on `quantity_for_commission` units of an order.
///
/// * Non-positive quantities earn no commission.
/// * `Lot` basis: a flat `rate` per unit of quantity. The order rate and lot size play no part.
/// * `Percent` basis: the quantity is converted to meters, priced at `rate`, the GST surcharge is added and
///   `percent`% of the total is taken.
///
/// The result is rounded to 2 decimal places and is never negative. Fails if any intermediate value overflows.
pub fn compute_commission(
    quantity_for_commission: Decimal,
    rate: Decimal,
    unit: QuantityUnit,
    lot_meters: Option<Decimal>,
    config: &CommissionConfig,
) -> Result<Decimal, AmountOverflow> {
    if quantity_for_commission <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let amount = match config {
        CommissionConfig::Lot { rate: lot_rate } => checked_product(quantity_for_commission, *lot_rate)?,
        CommissionConfig::Percent { percent } => {
            let meters = to_linear_measure(quantity_for_commission, unit, lot_meters)?;
            let base = checked_product(meters, rate)?;
            let gst = checked_product(base, GST_RATE)?;
            let total = base.checked_add(gst).ok_or_else(|| AmountOverflow(format!("{base} + {gst} GST")))?;
            checked_product(total, *percent / ONE_HUNDRED)?
        },
    };
    Ok(round2(amount).max(Decimal::ZERO))
}
