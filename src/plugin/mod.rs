//! Plugin Module
//!
//! Provides the plugin architecture:
//! - Plugin definitions and capability interfaces
//! - Capability facade injected into every plugin
//! - Module import and component registry
//! - Instance registry

pub mod context;
pub mod definition;
pub mod importer;
pub mod interface;
pub mod registry;

#[cfg(test)]
pub(crate) mod fixtures;

pub use context::PluginContext;
pub use definition::{ContainerKind, PluginDefinition};
pub use importer::{ModuleImporter, ModuleInit, StaticImporter};
pub use interface::{
    DataProvider, FirstLoaded, HeaderProvider, Plugin, PluginError, PluginFactory, PluginResult,
    QueryHandler, SharedStateConsumer,
};
pub use registry::{ComponentRegistry, PluginRecord, PluginRegistry};
