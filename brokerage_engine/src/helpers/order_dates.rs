use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("'{0}' is not a valid order date. Use an RFC 3339 timestamp or a YYYY-MM-DD date")]
pub struct OrderDateError(pub String);

/// Parses an order date. Full RFC 3339 timestamps are converted to UTC. Plain `YYYY-MM-DD` dates are taken as
/// midnight UTC.
pub fn parse_order_date(value: &str) -> Result<DateTime<Utc>, OrderDateError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| OrderDateError(value.to_string()))
}
