//! Brokerage Engine
//!
//! The brokerage engine keeps the order book of a fabric broker. Brokers take orders from customers, place them with
//! manufacturers, and earn a commission on every order. This library contains the core logic: converting order
//! quantities to meters, computing commissions, and managing an order from placement through to completion.
//!
//! The library is divided into three main sections:
//! 1. The pure calculation engine ([`mod@pricing`] and [`mod@lifecycle`]). Unit conversion, commission calculation and
//!    order amounts, and the rules that decide when a commission is recalculated or finalized.
//! 2. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API. The exception is the data types used in the
//!    database. These are defined in the `db_types` module and are public.
//! 3. The brokerage engine public API ([`mod@broker_api`]). This validates caller input and drives orders through the
//!    backend. Specific backends need to implement the traits in [`traits`] in order to act as a backend for the
//!    engine.
mod db;

mod broker_api;
pub mod config;
pub mod db_types;
pub mod helpers;
pub mod lifecycle;
pub mod pricing;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits;
pub use traits::{AccountManagement, BrokerageDatabase, BrokerageDbError};
pub use broker_api::{
    accounts_api::AccountApi,
    errors::OrderFlowError,
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use config::EngineConfig;
