//! Data provider directory.
//!
//! Maps data source identifiers to the plugin that answers for them and
//! routes `identifier:rest` queries.

use crate::core::{Error, InstanceId, Result};
use crate::plugin::interface::Plugin;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A registered provider.
#[derive(Clone)]
pub struct ProviderEntry {
    /// Registering instance
    pub instance_id: InstanceId,
    /// Provider plugin
    pub plugin: Arc<dyn Plugin>,
}

/// Split a data source on its first colon.
///
/// `"a:b:c"` addresses provider `"a"` with remainder `"b:c"`. A source
/// without a colon addresses the whole string with an empty remainder.
pub fn split_data_source(data_source: &str) -> (&str, &str) {
    data_source.split_once(':').unwrap_or((data_source, ""))
}

/// Registry of data providers.
pub struct ProviderDirectory {
    providers: RwLock<HashMap<String, ProviderEntry>>,
}

impl ProviderDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Register every identifier a plugin declares.
    ///
    /// All identifiers are checked before any is bound, so a rejected
    /// registration leaves the directory unchanged.
    pub fn register(&self, instance_id: InstanceId, plugin: Arc<dyn Plugin>) -> Result<usize> {
        let identifiers = match plugin.as_data_provider() {
            Some(provider) => provider.provider_identifiers(),
            None => return Ok(0),
        };

        let mut providers = self.providers.write();
        for identifier in &identifiers {
            if identifier.is_empty() {
                return Err(Error::EmptyProviderIdentifier);
            }
            if let Some(existing) = providers.get(identifier) {
                if existing.instance_id != instance_id {
                    return Err(Error::DuplicateProvider(identifier.clone()));
                }
            }
        }

        for identifier in &identifiers {
            providers.insert(
                identifier.clone(),
                ProviderEntry {
                    instance_id,
                    plugin: Arc::clone(&plugin),
                },
            );
        }
        info!(%instance_id, identifiers = ?identifiers, "Registered data provider");
        Ok(identifiers.len())
    }

    /// Check whether an identifier has a provider.
    pub fn has_provider(&self, identifier: &str) -> bool {
        self.providers.read().contains_key(identifier)
    }

    /// Provider registered for an identifier.
    pub fn provider(&self, identifier: &str) -> Option<ProviderEntry> {
        self.providers.read().get(identifier).cloned()
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.providers.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Route a query to the provider of its identifier.
    ///
    /// Unknown identifiers and providers without a query handler yield `None`.
    pub async fn query(&self, data_source: &str, payload: &Value) -> Option<Value> {
        let (identifier, rest) = split_data_source(data_source);
        let Some(entry) = self.provider(identifier) else {
            debug!(identifier, "No data provider for query");
            return None;
        };
        let handler = entry.plugin.as_query_handler()?;
        handler.query_data(identifier, rest, payload).await
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Whether no identifier is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

impl Default for ProviderDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::fixtures::{Provider, Silent};
    use serde_json::json;

    #[test]
    fn test_split_first_colon_only() {
        assert_eq!(split_data_source("a:b:c"), ("a", "b:c"));
        assert_eq!(split_data_source("tiles:"), ("tiles", ""));
        assert_eq!(split_data_source("tiles"), ("tiles", ""));
        assert_eq!(split_data_source(":x"), ("", "x"));
    }

    #[test]
    fn test_register_and_lookup() {
        let directory = ProviderDirectory::new();
        let provider = Arc::new(Provider::new(&["depth", "salinity"]));

        let count = directory.register(InstanceId::new(), provider).unwrap();
        assert_eq!(count, 2);
        assert!(directory.has_provider("depth"));
        assert!(directory.has_provider("salinity"));
        assert!(!directory.has_provider("wind"));
        assert_eq!(directory.identifiers(), vec!["depth", "salinity"]);
    }

    #[test]
    fn test_plugin_without_capability_registers_nothing() {
        let directory = ProviderDirectory::new();
        assert_eq!(directory.register(InstanceId::new(), Arc::new(Silent)).unwrap(), 0);
        assert!(directory.is_empty());
    }

    #[test]
    fn test_empty_identifier_is_fatal() {
        let directory = ProviderDirectory::new();
        let result = directory.register(InstanceId::new(), Arc::new(Provider::new(&["ok", ""])));
        assert!(matches!(result, Err(Error::EmptyProviderIdentifier)));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_duplicate_identifier_keeps_first_provider() {
        let directory = ProviderDirectory::new();
        let first = InstanceId::new();
        directory
            .register(first, Arc::new(Provider::new(&["depth"])))
            .unwrap();

        let result = directory.register(InstanceId::new(), Arc::new(Provider::new(&["wind", "depth"])));
        match result {
            Err(Error::DuplicateProvider(id)) => assert_eq!(id, "depth"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        assert_eq!(directory.len(), 1);
        assert!(!directory.has_provider("wind"));
        assert_eq!(directory.provider("depth").unwrap().instance_id, first);
    }

    #[test]
    fn test_same_instance_may_register_again() {
        let directory = ProviderDirectory::new();
        let id = InstanceId::new();
        let provider = Arc::new(Provider::new(&["depth"]));
        directory.register(id, provider.clone()).unwrap();
        assert!(directory.register(id, provider).is_ok());
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_query_routes_remainder_untouched() {
        let directory = ProviderDirectory::new();
        let provider = Arc::new(Provider::new(&["a"]));
        directory.register(InstanceId::new(), provider.clone()).unwrap();

        let result = directory.query("a:b:c", &json!({ "limit": 5 })).await;

        assert_eq!(
            result,
            Some(json!({ "identifier": "a", "rest": "b:c", "payload": { "limit": 5 } }))
        );
        assert_eq!(provider.queries(), vec![("a".to_string(), "b:c".to_string())]);
    }

    #[tokio::test]
    async fn test_query_unknown_identifier_is_none() {
        let directory = ProviderDirectory::new();
        assert_eq!(directory.query("nowhere:x", &json!(null)).await, None);
    }

    #[tokio::test]
    async fn test_query_without_handler_is_none() {
        let directory = ProviderDirectory::new();
        let provider = Arc::new(Provider::new(&["a"]).without_handler());
        directory.register(InstanceId::new(), provider).unwrap();
        assert_eq!(directory.query("a:x", &json!(null)).await, None);
    }
}
