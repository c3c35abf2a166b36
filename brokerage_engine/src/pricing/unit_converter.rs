use log::warn;
use rand::Rng;
use rust_decimal::Decimal;

use super::{checked_product, AmountOverflow};
use crate::db_types::QuantityUnit;

pub const TAKKA_PER_LOT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
/// Lot sizes are drawn in hundredths of a meter from `[LOT_MIN_CENTIMETERS, LOT_MAX_CENTIMETERS)`.
pub const LOT_MIN_CENTIMETERS: i64 = 145_000;
pub const LOT_MAX_CENTIMETERS: i64 = 155_000;

/// Converts `quantity`, declared in `unit`, into meters.
///
/// `lot_meters` is ignored for [`QuantityUnit::Meter`]. For the lot-based units a missing lot size is treated as zero.
/// Fails if the length in meters does not fit in a [`Decimal`].
pub fn to_linear_measure(
    quantity: Decimal,
    unit: QuantityUnit,
    lot_meters: Option<Decimal>,
) -> Result<Decimal, AmountOverflow> {
    if unit == QuantityUnit::Meter {
        return Ok(quantity);
    }
    let lot_meters = lot_meters.unwrap_or_else(|| {
        warn!("No lot size is available to convert {quantity} {unit} into meters. Using 0");
        Decimal::ZERO
    });
    match unit {
        QuantityUnit::Lot => checked_product(quantity, lot_meters),
        QuantityUnit::Takka | QuantityUnit::Meter => checked_product(quantity, lot_meters / TAKKA_PER_LOT),
    }
}

/// Draws a lot size, in meters, uniformly from `[1450, 1550)` at a resolution of 2 decimal places.
pub fn assign_lot_meters() -> Decimal {
    let centimeters = rand::thread_rng().gen_range(LOT_MIN_CENTIMETERS..LOT_MAX_CENTIMETERS);
    Decimal::new(centimeters, 2)
}
