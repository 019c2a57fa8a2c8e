//! Capability facade.
//!
//! Every plugin receives its own [`PluginContext`] at construction. The
//! context reaches host subsystems directly and never the host itself.
//! Subsystems that hold plugins (the bus and the directory) are referenced
//! weakly, so a plugin keeping its context does not keep the host alive.

use crate::core::{InstanceId, Properties, SharedStates};
use crate::data::ProviderDirectory;
use crate::layout::map::{LayerKind, MapBackend, MapLayer};
use crate::presenter::LargePresenter;
use crate::state::{LoadingAggregator, LoadingToken, SharedStateBus};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use url::Url;

/// Property key under which the configuration base URL is exposed.
pub const CONFIG_BASE_URL_KEY: &str = "configBaseUrl";

/// Property key under which the granted root directory is exposed.
pub const ROOT_DIRECTORY_KEY: &str = "rootDirectoryHandle";

/// Capability facade injected into a plugin.
#[derive(Clone)]
pub struct PluginContext {
    instance_id: InstanceId,
    loading: Arc<LoadingAggregator>,
    presenter: Arc<LargePresenter>,
    bus: Weak<SharedStateBus>,
    directory: Weak<ProviderDirectory>,
    map: Arc<dyn MapBackend>,
    root_directory: Option<PathBuf>,
    config_base_url: Url,
    /// Facade values overlaid with definition properties
    properties: Properties,
}

/// Host subsystems a context is built from.
pub struct ContextParts {
    pub loading: Arc<LoadingAggregator>,
    pub presenter: Arc<LargePresenter>,
    pub bus: Weak<SharedStateBus>,
    pub directory: Weak<ProviderDirectory>,
    pub map: Arc<dyn MapBackend>,
    pub root_directory: Option<PathBuf>,
    pub config_base_url: Url,
}

impl PluginContext {
    /// Build the facade for one instance.
    ///
    /// Definition properties win over facade values on key collision.
    pub fn new(instance_id: InstanceId, parts: ContextParts, definition_props: &Properties) -> Self {
        let mut properties = Properties::new();
        properties.insert(
            CONFIG_BASE_URL_KEY.to_string(),
            Value::String(parts.config_base_url.to_string()),
        );
        if let Some(root) = &parts.root_directory {
            properties.insert(
                ROOT_DIRECTORY_KEY.to_string(),
                Value::String(root.display().to_string()),
            );
        }
        for (key, value) in definition_props {
            properties.insert(key.clone(), value.clone());
        }

        Self {
            instance_id,
            loading: parts.loading,
            presenter: parts.presenter,
            bus: parts.bus,
            directory: parts.directory,
            map: parts.map,
            root_directory: parts.root_directory,
            config_base_url: parts.config_base_url,
            properties,
        }
    }

    /// Identifier of the plugin instance this context belongs to.
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Mark an operation as in flight.
    pub fn notify_loading(&self) -> LoadingToken {
        self.loading.begin()
    }

    /// Whether this plugin is currently enlarged.
    pub fn is_in_large_presenter(&self) -> bool {
        self.presenter.is_presenting(self.instance_id)
    }

    /// Current shared states.
    pub fn shared_states(&self) -> SharedStates {
        self.bus
            .upgrade()
            .map(|bus| bus.current())
            .unwrap_or_default()
    }

    /// Replace the shared states for every plugin.
    pub fn update_shared_states(&self, states: Properties) {
        if let Some(bus) = self.bus.upgrade() {
            bus.publish(states);
        }
    }

    /// Map handle.
    pub fn map(&self) -> &Arc<dyn MapBackend> {
        &self.map
    }

    /// Add a layer to the map and the layer switcher.
    pub fn add_map_layer(&self, layer: MapLayer, name: &str, kind: LayerKind, active: bool) {
        self.map.add_layer(layer, name, kind, active);
    }

    /// Remove a layer from the map.
    pub fn remove_map_layer(&self, layer_id: &str) {
        self.map.remove_layer(layer_id);
    }

    /// Whether a data provider answers for `identifier`.
    pub fn has_data_provider(&self, identifier: &str) -> bool {
        self.directory
            .upgrade()
            .map(|directory| directory.has_provider(identifier))
            .unwrap_or(false)
    }

    /// Query a data source addressed as `identifier:rest`.
    pub async fn query_data(&self, data_source: &str, payload: &Value) -> Option<Value> {
        let directory = self.directory.upgrade()?;
        directory.query(data_source, payload).await
    }

    /// Granted root directory, if local file access was requested.
    pub fn root_directory(&self) -> Option<&Path> {
        self.root_directory.as_deref()
    }

    /// Base URL of the configuration.
    pub fn config_base_url(&self) -> &Url {
        &self.config_base_url
    }

    /// Raw property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Typed property.
    pub fn get_property<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.properties
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// All properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("instance_id", &self.instance_id)
            .field("config_base_url", &self.config_base_url.as_str())
            .field("root_directory", &self.root_directory)
            .field("properties", &self.properties)
            .finish()
    }
}
