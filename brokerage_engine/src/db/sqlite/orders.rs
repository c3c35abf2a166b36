use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use super::{decimal_column, optional_decimal_column};
use crate::{
    db_types::{NewOrder, Order, OrderStatusType, QuantityUnit},
    order_objects::OrderQueryFilter,
    pricing::OrderAmounts,
};

impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let unit: String = row.try_get("quantity_unit")?;
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatusType>()
            .map_err(|e| sqlx::Error::ColumnDecode { index: "status".to_string(), source: Box::new(e) })?;
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            order_no: row.try_get("order_no")?,
            customer_id: row.try_get("customer_id")?,
            manufacturer_id: row.try_get("manufacturer_id")?,
            quality_id: row.try_get("quality_id")?,
            rate: decimal_column(row, "rate")?,
            quantity: decimal_column(row, "quantity")?,
            quantity_unit: QuantityUnit::normalize(&unit),
            lot_meters: optional_decimal_column(row, "lot_meters")?,
            meter: decimal_column(row, "meter")?,
            processed_quantity: row.try_get("processed_quantity")?,
            commission_amount: optional_decimal_column(row, "commission_amount")?,
            status,
            payment_due_days: row.try_get("payment_due_days")?,
            remarks: row.try_get("remarks")?,
            order_date: row.try_get("order_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// The references in `order` must already have been checked, and the quality resolved to `quality_id`.
pub async fn insert_order(
    account_id: i64,
    order_no: i64,
    quality_id: i64,
    order: &NewOrder,
    amounts: &OrderAmounts,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                account_id,
                order_no,
                customer_id,
                manufacturer_id,
                quality_id,
                rate,
                quantity,
                quantity_unit,
                lot_meters,
                meter,
                processed_quantity,
                commission_amount,
                status,
                payment_due_days,
                remarks,
                order_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11, $12, $13, $14, $15)
            RETURNING *;
        "#,
    )
    .bind(account_id)
    .bind(order_no)
    .bind(order.customer_id)
    .bind(order.manufacturer_id)
    .bind(quality_id)
    .bind(order.rate.to_string())
    .bind(order.quantity.to_string())
    .bind(amounts.quantity_unit.as_str())
    .bind(amounts.lot_meters.map(|m| m.to_string()))
    .bind(amounts.meter.to_string())
    .bind(amounts.commission_amount.to_string())
    .bind(OrderStatusType::Pending.to_string())
    .bind(order.payment_due_days)
    .bind(order.remarks.as_deref())
    .bind(order.order_date)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order #{} inserted for account #{account_id} with id {}", order.order_no, order.id);
    Ok(order)
}

pub async fn fetch_order(
    account_id: i64,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND account_id = $2")
        .bind(order_id)
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Bumps the order's `updated_at` timestamp. Returns `false` if the account has no such order.
///
/// Updates call this first, so that the transaction holds the write lock before it reads the order.
pub async fn touch_order(account_id: i64, order_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND account_id = $2")
        .bind(order_id)
        .bind(account_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Writes every mutable field of `order` back to the database and returns the stored record.
pub async fn save_order(order: &Order, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let saved = sqlx::query_as(
        r#"
            UPDATE orders SET
                customer_id = $1,
                manufacturer_id = $2,
                quality_id = $3,
                rate = $4,
                quantity = $5,
                quantity_unit = $6,
                lot_meters = $7,
                meter = $8,
                processed_quantity = $9,
                commission_amount = $10,
                status = $11,
                payment_due_days = $12,
                remarks = $13,
                order_date = $14,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $15 AND account_id = $16
            RETURNING *;
        "#,
    )
    .bind(order.customer_id)
    .bind(order.manufacturer_id)
    .bind(order.quality_id)
    .bind(order.rate.to_string())
    .bind(order.quantity.to_string())
    .bind(order.quantity_unit.as_str())
    .bind(order.lot_meters.map(|m| m.to_string()))
    .bind(order.meter.to_string())
    .bind(order.processed_quantity)
    .bind(order.commission_amount.map(|c| c.to_string()))
    .bind(order.status.to_string())
    .bind(order.payment_due_days)
    .bind(order.remarks.as_deref())
    .bind(order.order_date)
    .bind(order.id)
    .bind(order.account_id)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Order #{} saved", order.order_no);
    Ok(saved)
}

/// Fetches the account's orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `order_no` in ascending order
pub async fn search_orders(
    account_id: i64,
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM orders WHERE account_id = ");
    builder.push_bind(account_id);
    if let Some(customer_id) = query.customer_id {
        builder.push(" AND customer_id = ");
        builder.push_bind(customer_id);
    }
    if let Some(manufacturer_id) = query.manufacturer_id {
        builder.push(" AND manufacturer_id = ");
        builder.push_bind(manufacturer_id);
    }
    if let Some(quality_id) = query.quality_id {
        builder.push(" AND quality_id = ");
        builder.push_bind(quality_id);
    }
    if let Some(statuses) = query.statuses.filter(|s| !s.is_empty()) {
        builder.push(" AND status IN (");
        let mut in_clause = builder.separated(", ");
        for status in statuses {
            in_clause.push_bind(status.to_string());
        }
        in_clause.push_unseparated(")");
    }
    if let Some(since) = query.since {
        builder.push(" AND julianday(order_date) >= julianday(");
        builder.push_bind(since);
        builder.push(")");
    }
    if let Some(until) = query.until {
        builder.push(" AND julianday(order_date) <= julianday(");
        builder.push_bind(until);
        builder.push(")");
    }
    builder.push(" ORDER BY order_no ASC");

    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("📝️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}
