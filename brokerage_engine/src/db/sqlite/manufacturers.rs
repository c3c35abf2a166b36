use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Manufacturer, NewManufacturer};

pub async fn insert_manufacturer(
    account_id: i64,
    manufacturer: NewManufacturer,
    conn: &mut SqliteConnection,
) -> Result<Manufacturer, sqlx::Error> {
    let manufacturer = sqlx::query_as(
        r#"
            INSERT INTO manufacturers (account_id, name, firm_name, gst_no, address, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(manufacturer.name)
    .bind(manufacturer.firm_name)
    .bind(manufacturer.gst_no)
    .bind(manufacturer.address)
    .bind(manufacturer.phone)
    .bind(manufacturer.email)
    .fetch_one(conn)
    .await?;
    Ok(manufacturer)
}

pub async fn fetch_manufacturer(
    account_id: i64,
    manufacturer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Manufacturer>, sqlx::Error> {
    let manufacturer = sqlx::query_as("SELECT * FROM manufacturers WHERE id = $1 AND account_id = $2")
        .bind(manufacturer_id)
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(manufacturer)
}

/// Sets (or clears) the display name of the manufacturer's firm.
pub async fn update_firm_name(
    manufacturer_id: i64,
    firm_name: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE manufacturers SET firm_name = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(firm_name)
        .bind(manufacturer_id)
        .execute(conn)
        .await?;
    debug!("🗃️ Manufacturer #{manufacturer_id} firm name set to {firm_name:?}");
    Ok(())
}
