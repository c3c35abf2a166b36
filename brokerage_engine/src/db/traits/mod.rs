//! #  Database management and control.
//!
//! This module provides the interfaces that define the contracts of the brokerage engine database *backends*.
//!
//! ## Accounts
//! An account is the broker. It owns a set of customers, manufacturers and fabric qualities, and the orders placed
//! between them. Every account carries its own order counter, from which order sequence numbers are allocated.
//!
//! ## Traits
//! * [`BrokerageDatabase`] defines the order workflow: creating and updating orders as single atomic units of work,
//!   and querying them.
//! * [`AccountManagement`] provides methods for creating and querying accounts and the parties that orders refer to.
mod account_management;
mod brokerage_database;

pub use account_management::AccountManagement;
pub use brokerage_database::{BrokerageDatabase, BrokerageDbError};
