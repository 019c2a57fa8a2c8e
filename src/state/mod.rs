//! State Module
//!
//! Host-owned mutable state shared with plugins:
//! - Shared state bus
//! - Loading state aggregation

pub mod bus;
pub mod loading;

pub use bus::SharedStateBus;
pub use loading::{LoadingAggregator, LoadingToken};
