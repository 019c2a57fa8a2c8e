//! Module import seam.
//!
//! Importing a module defines its components in the [`ComponentRegistry`].
//! How a module is fetched and evaluated belongs to the embedding
//! environment; [`StaticImporter`] serves modules compiled into the host.

use crate::core::{Error, Result};
use crate::plugin::interface::PluginFactory;
use crate::plugin::registry::ComponentRegistry;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use url::Url;

/// Loads plugin modules.
#[async_trait]
pub trait ModuleImporter: Send + Sync {
    /// Import the module at `url`, declared under `name`.
    async fn import(&self, name: &str, url: &Url, components: &ComponentRegistry) -> Result<()>;
}

/// Module body: defines components when the module is evaluated.
pub type ModuleInit = Arc<dyn Fn(&ComponentRegistry) -> Result<()> + Send + Sync>;

/// Importer for modules linked into the host binary.
///
/// Like a module cache, each URL is evaluated at most once.
#[derive(Default)]
pub struct StaticImporter {
    modules: HashMap<String, ModuleInit>,
    evaluated: Mutex<HashSet<String>>,
}

impl StaticImporter {
    /// Create an importer with no modules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a module at a URL.
    pub fn with_module(mut self, url: &str, init: ModuleInit) -> Self {
        self.modules.insert(url.to_string(), init);
        self
    }

    /// Serve a module that defines a single component.
    pub fn with_component(self, url: &str, name: &str, factory: Arc<dyn PluginFactory>) -> Self {
        let name = name.to_string();
        self.with_module(
            url,
            Arc::new(move |components: &ComponentRegistry| {
                components.define(&name, Arc::clone(&factory));
                Ok(())
            }),
        )
    }

    /// Whether a module has been evaluated.
    pub fn is_evaluated(&self, url: &str) -> bool {
        self.evaluated.lock().contains(url)
    }
}

#[async_trait]
impl ModuleImporter for StaticImporter {
    async fn import(&self, name: &str, url: &Url, components: &ComponentRegistry) -> Result<()> {
        let init = self
            .modules
            .get(url.as_str())
            .ok_or_else(|| Error::ImportFailed {
                name: name.to_string(),
                url: url.to_string(),
                reason: "module not found".to_string(),
            })?;

        if !self.evaluated.lock().insert(url.to_string()) {
            return Ok(());
        }
        init(components).map_err(|e| Error::ImportFailed {
            name: name.to_string(),
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::fixtures::ProbeFactory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "https://maps.example.org/plugins/legend.js";

    #[tokio::test]
    async fn test_import_defines_component() {
        let importer = StaticImporter::new().with_component(URL, "legend", Arc::new(ProbeFactory::default()));
        let components = ComponentRegistry::new();

        importer
            .import("legend", &Url::parse(URL).unwrap(), &components)
            .await
            .unwrap();

        assert!(components.is_defined("legend"));
        assert!(importer.is_evaluated(URL));
    }

    #[tokio::test]
    async fn test_unknown_module_fails() {
        let importer = StaticImporter::new();
        let components = ComponentRegistry::new();

        let result = importer
            .import("legend", &Url::parse(URL).unwrap(), &components)
            .await;

        assert!(matches!(result, Err(Error::ImportFailed { .. })));
    }

    #[tokio::test]
    async fn test_module_evaluated_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let importer = StaticImporter::new().with_module(
            URL,
            Arc::new(move |_: &ComponentRegistry| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        let components = ComponentRegistry::new();
        let url = Url::parse(URL).unwrap();

        importer.import("legend", &url, &components).await.unwrap();
        importer.import("legend-again", &url, &components).await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_module_error_is_import_failure() {
        let importer = StaticImporter::new().with_module(
            URL,
            Arc::new(|_: &ComponentRegistry| Err(Error::Internal("syntax error".to_string()))),
        );
        let components = ComponentRegistry::new();

        let err = importer
            .import("legend", &Url::parse(URL).unwrap(), &components)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("syntax error"));
    }
}
