mod order_dates;
mod serde_helpers;

pub use order_dates::{parse_order_date, OrderDateError};
pub use serde_helpers::double_option;
