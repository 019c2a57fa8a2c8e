//! Configuration Module
//!
//! Provides the declarative host configuration:
//! - Plugin definitions and module imports
//! - Initial map view
//! - Host-level options (import base, page info, transitions)

pub mod host;

pub use host::{HostConfig, HostOptions, TransitionMode, ViewConfig};
