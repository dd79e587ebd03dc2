//! Common types and utilities for the link statistics services
//!
//! Identifier types, the in-memory network model, shared error definitions,
//! numeric constants and small sampling utilities.

pub mod constants;
pub mod errors;
pub mod network;
pub mod sampling;
pub mod types;

pub use errors::StatsError;
pub use network::{Link, Network};
pub use sampling::WeightedCoin;
pub use types::{LinkId, NodeId};
