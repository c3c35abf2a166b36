//! # Order lifecycle
//!
//! Orders start out `PENDING` and are moved to `COMPLETED` or `CANCELLED` by an explicit update. There are no
//! implicit transitions, and every status can be set from every other one.
//!
//! The status decides which quantity the commission is based on:
//!
//! | Situation                                              | Commission basis quantity | Persisted |
//! |--------------------------------------------------------|---------------------------|-----------|
//! | Order created, or rate/quantity/unit/customer changed  | full `quantity`           | yes       |
//! | Status set to `COMPLETED` in this update               | `processed_quantity`      | yes       |
//! | Progress changed on an order that was `COMPLETED`      | `processed_quantity`      | yes       |
//! | Reading a `PENDING` order                              | `processed_quantity`      | no        |
//!
//! When an update both changes the amount inputs and finalizes, the amounts are recalculated first (with the new
//! rate, unit and customer) and the commission is then replaced by the finalized value.
use log::*;
use rust_decimal::Decimal;

use crate::{
    db_types::{CommissionConfig, Order, OrderStatusType, OrderUpdate},
    pricing::{compute_commission, compute_order_amounts, AmountOverflow},
};

/// The references in an [`OrderUpdate`] after the backend has resolved them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvedReferences {
    pub quality_id: Option<i64>,
}

/// The commission earned so far on a pending order, based on its processed quantity. Returns `None` for orders that
/// are no longer pending.
pub fn progress_commission(order: &Order, config: &CommissionConfig) -> Option<Decimal> {
    if order.status != OrderStatusType::Pending {
        return None;
    }
    let processed = Decimal::from(order.processed_quantity.max(0));
    compute_commission(processed, order.rate, order.quantity_unit, order.lot_meters, config)
        .map_err(|e| warn!("Order #{} has no progress commission. {e}", order.order_no))
        .ok()
}

/// Whether the stored commission must be recomputed from the processed quantity.
///
/// This is the case when the update completes the order, or when it changes the progress of an order that was
/// already completed before the update.
pub fn should_finalize_commission(update: &OrderUpdate, current_status: OrderStatusType) -> bool {
    let completing = update.status == Some(OrderStatusType::Completed);
    let progress_after_completion =
        update.processed_quantity.is_some() && current_status == OrderStatusType::Completed;
    completing || progress_after_completion
}

/// Computes the new state of `existing` after applying `update`.
///
/// `config` must be the commission configuration of the customer the order will be linked to after the update.
/// The returned order keeps the existing `id`, sequence number and timestamps; the backend stamps `updated_at`.
///
/// Fails, leaving `existing` untouched, if the new processed quantity or any of the amounts overflow.
pub fn apply_update(
    existing: &Order,
    update: &OrderUpdate,
    references: ResolvedReferences,
    config: &CommissionConfig,
) -> Result<Order, AmountOverflow> {
    let mut order = existing.clone();
    if let Some(customer_id) = update.customer_id {
        order.customer_id = customer_id;
    }
    if let Some(manufacturer_id) = update.manufacturer_id {
        order.manufacturer_id = manufacturer_id;
    }
    if let Some(quality_id) = references.quality_id {
        order.quality_id = quality_id;
    }
    if let Some(rate) = update.rate {
        order.rate = rate;
    }
    if let Some(quantity) = update.quantity {
        order.quantity = quantity;
    }
    if let Some(unit) = update.quantity_unit {
        order.quantity_unit = unit;
    }
    if let Some(order_date) = update.order_date {
        order.order_date = order_date;
    }
    if let Some(remarks) = &update.remarks {
        order.remarks = remarks.clone();
    }
    if let Some(days) = update.payment_due_days {
        order.payment_due_days = days;
    }
    if let Some(change) = update.processed_quantity {
        order.processed_quantity = change.apply(existing.processed_quantity).ok_or_else(|| {
            AmountOverflow(format!("processed quantity {} with {change:?}", existing.processed_quantity))
        })?;
    }
    if let Some(status) = update.status {
        order.status = status;
    }

    if update.affects_amounts() {
        let amounts =
            compute_order_amounts(order.quantity, order.rate, order.quantity_unit, config, order.lot_meters)?;
        trace!(
            "Order #{} amounts recalculated. {} {} @ {} = {}m, commission {}",
            existing.order_no,
            order.quantity,
            amounts.quantity_unit,
            order.rate,
            amounts.meter,
            amounts.commission_amount
        );
        order.quantity_unit = amounts.quantity_unit;
        order.lot_meters = amounts.lot_meters;
        order.meter = amounts.meter;
        order.commission_amount = Some(amounts.commission_amount);
    }

    // Pending orders price their processed quantity on every read, so it must price here too.
    let processed = Decimal::from(order.processed_quantity.max(0));
    let commission = compute_commission(processed, order.rate, order.quantity_unit, order.lot_meters, config)?;
    if should_finalize_commission(update, existing.status) {
        debug!(
            "Order #{} commission finalized at {commission} for {} of {} {}",
            existing.order_no, order.processed_quantity, order.quantity, order.quantity_unit
        );
        order.commission_amount = Some(commission);
    }
    Ok(order)
}
