//! # Brokerage engine public API
//!
//! The `broker_api` module exposes the programmatic API for the brokerage engine.
//!
//! * [`accounts_api`] provides methods for managing broker accounts, and the customers, manufacturers and fabric
//!   qualities their orders refer to.
//! * [`order_flow_api`] is the primary API for creating orders and moving them through their lifecycle.
//!
//! The other submodules in this module are support types: caller-facing request and view objects, and the error
//! type shared by both APIs.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the
//! API.
//!
//! ```rust,ignore
//! use brokerage_engine::{order_objects::NewOrderRequest, OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/brokerage.db", 5).await?;
//! let api = OrderFlowApi::new(db);
//! let order = api.create_order(account_id, request).await?;
//! println!("{}", serde_json::to_string(&order)?);
//! ```

pub mod accounts_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
