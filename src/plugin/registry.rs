//! Plugin registry for managing plugins.
//!
//! [`ComponentRegistry`] maps import names to instantiable component types;
//! modules fill it when they are imported. [`PluginRegistry`] creates
//! instances from definitions and keeps them in configuration order.

use crate::core::{now, DefinitionKey, Error, InstanceId, Result, Timestamp};
use crate::plugin::context::PluginContext;
use crate::plugin::definition::PluginDefinition;
use crate::plugin::interface::{Plugin, PluginFactory};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Import name → component type.
pub struct ComponentRegistry {
    components: RwLock<HashMap<String, Arc<dyn PluginFactory>>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
        }
    }

    /// Define a component. The first definition of a name wins.
    pub fn define(&self, name: &str, factory: Arc<dyn PluginFactory>) -> bool {
        let mut components = self.components.write();
        if components.contains_key(name) {
            warn!(name, "Component already defined, keeping the first definition");
            return false;
        }
        components.insert(name.to_string(), factory);
        debug!(name, "Component defined");
        true
    }

    /// Component type for an import name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PluginFactory>> {
        self.components.read().get(name).cloned()
    }

    /// Whether a name is defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.components.read().contains_key(name)
    }

    /// Defined names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registered plugin entry.
pub struct PluginRecord {
    /// Position of the definition in the configuration
    pub key: DefinitionKey,
    /// Definition the instance was created from
    pub definition: PluginDefinition,
    /// Instance ID
    pub instance_id: InstanceId,
    /// Plugin instance
    pub plugin: Arc<dyn Plugin>,
    /// Creation time
    pub loaded_at: Timestamp,
}

/// Definition → instance association, in configuration order.
#[derive(Default)]
pub struct PluginRegistry {
    records: Vec<PluginRecord>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the instance for a definition.
    ///
    /// An import name with no component yields `Ok(None)` and no record.
    /// `context` builds the facade for the freshly assigned instance ID.
    pub fn instantiate<F>(
        &mut self,
        components: &ComponentRegistry,
        key: DefinitionKey,
        definition: &PluginDefinition,
        context: F,
    ) -> Result<Option<(InstanceId, Arc<dyn Plugin>)>>
    where
        F: FnOnce(InstanceId) -> PluginContext,
    {
        let Some(factory) = components.get(&definition.import) else {
            debug!(import = %definition.import, "No component for import, skipping plugin");
            return Ok(None);
        };

        let instance_id = InstanceId::new();
        let plugin = factory
            .create(context(instance_id))
            .map_err(|e| Error::PluginCreation {
                import: definition.import.clone(),
                reason: e.message,
            })?;

        self.records.push(PluginRecord {
            key,
            definition: definition.clone(),
            instance_id,
            plugin: Arc::clone(&plugin),
            loaded_at: now(),
        });
        info!(import = %definition.import, %instance_id, "Plugin created");
        Ok(Some((instance_id, plugin)))
    }

    /// Record for a definition position.
    pub fn instance_for(&self, key: DefinitionKey) -> Option<&PluginRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    /// Record for an instance.
    pub fn get(&self, instance_id: InstanceId) -> Option<&PluginRecord> {
        self.records.iter().find(|r| r.instance_id == instance_id)
    }

    /// All records in configuration order.
    pub fn records(&self) -> &[PluginRecord] {
        &self.records
    }

    /// Fire the first-loaded hook on every instance, in order.
    pub fn notify_first_loaded(&self) -> usize {
        let mut notified = 0;
        for record in &self.records {
            if let Some(hook) = record.plugin.as_first_loaded() {
                hook.on_first_loaded();
                notified += 1;
            }
        }
        notified
    }

    /// Number of instances.
    pub fn plugin_count(&self) -> usize {
        self.records.len()
    }
}
