//! Host configuration.
//!
//! The declarative document a host is built from, plus the host-level
//! options that are not part of the document itself.

use crate::core::{Error, Properties, Result};
use crate::plugin::definition::PluginDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Initial map view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// Map center as `[lat, lng]`
    pub center: [f64; 2],
    /// Zoom level
    pub zoom: f64,
    /// Options passed through to the mapping library
    #[serde(default)]
    pub options: Properties,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 2.0,
            options: Properties::new(),
        }
    }
}

/// Declarative host configuration, consumed once at load time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// Plugin definitions in load order
    #[serde(default)]
    pub plugins: Vec<PluginDefinition>,
    /// Plugin name → module URL, in import order
    #[serde(default)]
    pub imports: IndexMap<String, String>,
    /// Initial map view
    #[serde(default)]
    pub view: ViewConfig,
    /// Block plugin loading until a root directory is granted
    #[serde(default)]
    pub access_local_files: bool,
    /// Page title
    pub page_title: Option<String>,
    /// Page favicon URL
    pub favicon: Option<String>,
    /// Rendering hint for the mapping library
    #[serde(default)]
    pub prefer_canvas: bool,
}

impl HostConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HostConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&text)
    }

    /// Check that every import URL parses.
    pub fn validate(&self) -> Result<()> {
        let base = HostOptions::default();
        for (name, url) in self.import_entries() {
            base.resolve_import(name, url)?;
        }
        Ok(())
    }

    /// Import entries in declaration order.
    pub fn import_entries(&self) -> Vec<(&str, &str)> {
        self.imports
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
            .collect()
    }

    /// Add a plugin definition.
    pub fn with_plugin(mut self, definition: PluginDefinition) -> Self {
        self.plugins.push(definition);
        self
    }

    /// Declare a module import.
    pub fn with_import(mut self, name: &str, url: &str) -> Self {
        self.imports.insert(name.to_string(), url.to_string());
        self
    }

    /// Require local file access before loading plugins.
    pub fn with_local_files(mut self) -> Self {
        self.access_local_files = true;
        self
    }
}

/// Visual transition used by the large-view presenter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TransitionMode {
    /// Mutate without animation
    Immediate,
    /// Cross-fade for the given duration
    CrossFade {
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
}

impl Default for TransitionMode {
    fn default() -> Self {
        TransitionMode::CrossFade { duration_ms: 250 }
    }
}

/// Host-level options that are not part of the configuration document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostOptions {
    /// Base for resolving import URLs
    pub base_url: Option<Url>,
    /// URL of the hosting document, the fallback base
    pub document_url: Url,
    /// Allow applying page title and favicon
    pub allow_modifying_page_info: bool,
    /// Presenter transition
    pub transition: TransitionMode,
}

impl HostOptions {
    /// Create options for a hosting document.
    pub fn new(document_url: Url) -> Self {
        Self {
            base_url: None,
            document_url,
            allow_modifying_page_info: false,
            transition: TransitionMode::default(),
        }
    }

    /// Set the import base URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Allow page title and favicon updates.
    pub fn allow_page_info(mut self) -> Self {
        self.allow_modifying_page_info = true;
        self
    }

    /// Set the presenter transition.
    pub fn with_transition(mut self, transition: TransitionMode) -> Self {
        self.transition = transition;
        self
    }

    /// Base that import URLs and `config_base_url` resolve against.
    pub fn import_base(&self) -> &Url {
        self.base_url.as_ref().unwrap_or(&self.document_url)
    }

    /// Resolve a module URL from the configuration.
    pub fn resolve_import(&self, name: &str, url: &str) -> Result<Url> {
        self.import_base()
            .join(url)
            .map_err(|e| Error::InvalidImportUrl {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self::new(Url::parse("http://localhost/").expect("literal url parses"))
    }
}
