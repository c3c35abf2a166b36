use serde_json::json;
use thiserror::Error;

use crate::{db_types::ConversionError, helpers::OrderDateError, pricing::AmountOverflow, traits::BrokerageDbError};

/// The error surface of the public brokerage API. Every variant maps onto an HTTP-style status code, and is rendered
/// as a `{ "message": ... }` body.
#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    ReferenceNotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl OrderFlowError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::ReferenceNotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::DatabaseError(_) => 500,
        }
    }

    pub fn error_body(&self) -> serde_json::Value {
        json!({ "message": self.to_string() })
    }
}

impl From<BrokerageDbError> for OrderFlowError {
    fn from(e: BrokerageDbError) -> Self {
        match e {
            BrokerageDbError::AccountNotFound(_) => Self::ReferenceNotFound("account not found".into()),
            BrokerageDbError::CustomerNotFound(_) => Self::ReferenceNotFound("customer not found".into()),
            BrokerageDbError::ManufacturerNotFound(_) => Self::ReferenceNotFound("manufacturer not found".into()),
            BrokerageDbError::OrderNotFound(_) => Self::ReferenceNotFound("order not found".into()),
            BrokerageDbError::UniqueViolation(s) => {
                Self::Conflict(format!("A record with this value already exists. {s}"))
            },
            BrokerageDbError::AmountOverflow(e) => Self::from(e),
            BrokerageDbError::DatabaseError(s) | BrokerageDbError::InvalidData(s) => Self::DatabaseError(s),
        }
    }
}

impl From<ConversionError> for OrderFlowError {
    fn from(e: ConversionError) -> Self {
        Self::ValidationError(e.to_string())
    }
}

impl From<AmountOverflow> for OrderFlowError {
    fn from(e: AmountOverflow) -> Self {
        Self::ValidationError(e.to_string())
    }
}

impl From<OrderDateError> for OrderFlowError {
    fn from(e: OrderDateError) -> Self {
        Self::ValidationError(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn database_errors_map_to_status_codes() {
        let err = OrderFlowError::from(BrokerageDbError::CustomerNotFound(4));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_body(), json!({ "message": "customer not found" }));
        let err = OrderFlowError::from(BrokerageDbError::UniqueViolation("qualities.name".into()));
        assert_eq!(err.status_code(), 409);
        let err = OrderFlowError::from(BrokerageDbError::InvalidData("rate".into()));
        assert_eq!(err.status_code(), 500);
        assert_eq!(OrderFlowError::validation("nope").status_code(), 400);
        let err = OrderFlowError::from(BrokerageDbError::AmountOverflow(AmountOverflow("1e20 x 1e10".into())));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "The order amounts are too large to compute (1e20 x 1e10)");
    }
}
