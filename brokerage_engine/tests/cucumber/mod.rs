pub mod brokerage_world;
pub mod setups;
pub mod steps;

pub use brokerage_world::BrokerageWorld;
