//! Core utilities and common types for Map Shell.

pub mod error;
pub mod logging;
pub mod types;

pub use error::{Error, Result};
pub use logging::{init_tracing, LogConfig, LogFormat};
pub use types::*;
