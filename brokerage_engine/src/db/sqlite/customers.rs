use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use super::optional_decimal_column;
use crate::db_types::{CommissionConfig, Customer, NewCustomer};

impl<'r> FromRow<'r, SqliteRow> for Customer {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let basis: String = row.try_get("commission_basis")?;
        let percent = optional_decimal_column(row, "commission_percent")?;
        let lot_rate = optional_decimal_column(row, "commission_lot_rate")?;
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            name: row.try_get("name")?,
            gst_no: row.try_get("gst_no")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            commission: CommissionConfig::from_columns(Some(&basis), percent, lot_rate),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn insert_customer(
    account_id: i64,
    customer: NewCustomer,
    conn: &mut SqliteConnection,
) -> Result<Customer, sqlx::Error> {
    let commission = customer.commission;
    let customer = sqlx::query_as(
        r#"
            INSERT INTO customers (
                account_id,
                name,
                gst_no,
                address,
                phone,
                email,
                commission_basis,
                commission_percent,
                commission_lot_rate
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(customer.name)
    .bind(customer.gst_no)
    .bind(customer.address)
    .bind(customer.phone)
    .bind(customer.email)
    .bind(commission.basis())
    .bind(commission.percent().map(|p| p.to_string()))
    .bind(commission.lot_rate().map(|r| r.to_string()))
    .fetch_one(conn)
    .await?;
    Ok(customer)
}

pub async fn fetch_customer(
    account_id: i64,
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1 AND account_id = $2")
        .bind(customer_id)
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(customer)
}
