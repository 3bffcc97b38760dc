//! tradelab — strategy simulation and portfolio rebalancing engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`]. The [`contract`]
//! module is the typed request/response surface consumed by external
//! serving layers.

pub mod adapters;
pub mod cli;
pub mod contract;
pub mod domain;
pub mod ports;
