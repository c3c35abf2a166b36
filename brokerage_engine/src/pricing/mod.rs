//! # Order amount and commission computation
//!
//! Everything in this module is a pure, synchronous computation. The database backends call into it from inside
//! their transactions, once the customer's commission configuration has been loaded.
//!
//! * [`unit_converter`] converts declared quantities into meters, and draws the per-order lot size.
//! * [`commission`] computes a commission under either of the customer commission bases.
//! * [`order_amounts`] combines the two into the set of derived fields stored on an order.
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub mod commission;
pub mod order_amounts;
pub mod unit_converter;

pub use commission::compute_commission;
pub use order_amounts::{compute_order_amounts, OrderAmounts};
pub use unit_converter::{assign_lot_meters, to_linear_measure};

/// An order amount fell outside the range a [`Decimal`] (or a processed quantity) can hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The order amounts are too large to compute ({0})")]
pub struct AmountOverflow(pub String);

/// Multiplies two decimals, failing instead of panicking when the product overflows.
pub fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal, AmountOverflow> {
    a.checked_mul(b).ok_or_else(|| AmountOverflow(format!("{a} x {b}")))
}

/// Rounds to the nearest hundredth, with midpoints rounded up (away from zero).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
