//! Data Module
//!
//! Data provider directory and identifier-addressed query routing.

pub mod directory;

pub use directory::{split_data_source, ProviderDirectory, ProviderEntry};
