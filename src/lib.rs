//! # Map Shell - configuration-driven map plugin host
//!
//! Assembles a map-centric visualization from a list of plugins:
//! - **Plugins**: imported modules, capability traits and the per-instance facade
//! - **State**: aggregated loading indicator and the shared state bus
//! - **Data**: directory of data providers and query routing
//! - **Layout**: hidden pool, main/sidebar shells and map controls
//! - **Presenter**: the single large view with optional cross-fade
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mapshell::config::{HostConfig, HostOptions};
//! use mapshell::host::MapHost;
//! use mapshell::plugin::StaticImporter;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> mapshell::Result<()> {
//!     let config = HostConfig::from_file("config.json").await?;
//!     let options = HostOptions::default();
//!     let mut host = MapHost::new(config, options, Arc::new(StaticImporter::new()));
//!     host.load().await?;
//!     println!("{} plugins loaded", host.registry().plugin_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod host;
pub mod layout;
pub mod plugin;
pub mod presenter;
pub mod state;

pub use core::error::{Error, Result};
