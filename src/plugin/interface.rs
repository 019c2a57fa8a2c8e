//! Plugin interface definition.
//!
//! A plugin implements [`Plugin`] plus zero or more capability traits. The
//! host never probes for methods; it asks the plugin for each capability
//! through the `as_*` accessors, which default to `None`.

use crate::core::SharedStates;
use crate::plugin::context::PluginContext;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Plugin-specific error.
#[derive(Clone, Debug)]
pub struct PluginError {
    /// Error message
    pub message: String,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginError: {}", self.message)
    }
}

impl std::error::Error for PluginError {}

/// Supplies the header text shown in a plugin's shell and in the large view.
pub trait HeaderProvider: Send + Sync {
    /// Header text, computed on demand.
    fn header(&self) -> Option<String>;
}

/// Hook fired once after every plugin of the configuration has loaded.
pub trait FirstLoaded: Send + Sync {
    fn on_first_loaded(&self);
}

/// Declares the data source identifiers a plugin answers for.
pub trait DataProvider: Send + Sync {
    fn provider_identifiers(&self) -> Vec<String>;
}

/// Answers routed data queries.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    /// Handle a query addressed as `identifier:rest`.
    async fn query_data(&self, identifier: &str, rest: &str, payload: &Value) -> Option<Value>;
}

/// Receives every shared-state broadcast.
pub trait SharedStateConsumer: Send + Sync {
    fn receive_shared_states(&self, states: SharedStates);
}

/// Plugin trait that all plugins must implement.
pub trait Plugin: Send + Sync {
    /// Header capability.
    fn as_header_provider(&self) -> Option<&dyn HeaderProvider> {
        None
    }

    /// First-loaded capability.
    fn as_first_loaded(&self) -> Option<&dyn FirstLoaded> {
        None
    }

    /// Data provider capability.
    fn as_data_provider(&self) -> Option<&dyn DataProvider> {
        None
    }

    /// Query handler capability.
    fn as_query_handler(&self) -> Option<&dyn QueryHandler> {
        None
    }

    /// Shared-state consumer capability.
    fn as_shared_state_consumer(&self) -> Option<&dyn SharedStateConsumer> {
        None
    }

    /// Header text, if the plugin provides one.
    fn header_text(&self) -> Option<String> {
        self.as_header_provider().and_then(|p| p.header())
    }
}

/// Instantiable component type registered under an import name.
///
/// The context is handed over at construction, so a plugin is never
/// observable without its capabilities injected.
pub trait PluginFactory: Send + Sync {
    fn create(&self, context: PluginContext) -> PluginResult<Arc<dyn Plugin>>;
}

impl<F> PluginFactory for F
where
    F: Fn(PluginContext) -> PluginResult<Arc<dyn Plugin>> + Send + Sync,
{
    fn create(&self, context: PluginContext) -> PluginResult<Arc<dyn Plugin>> {
        self(context)
    }
}
