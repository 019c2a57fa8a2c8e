//! Map backend seam.
//!
//! Rendering belongs to an external mapping library. The host only needs
//! to set the view, register shell controls and layers, and lock gestures.

use crate::config::ViewConfig;
use crate::core::Properties;
use crate::layout::stage::ShellId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How a layer appears in the layer switcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Mutually exclusive base layer
    Base,
    /// Toggleable overlay
    Overlay,
}

/// A layer handed to the mapping library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapLayer {
    /// Layer ID
    pub id: String,
    /// Library-specific layer description
    pub source: Value,
}

impl MapLayer {
    /// Create a layer.
    pub fn new(id: &str, source: Value) -> Self {
        Self {
            id: id.to_string(),
            source,
        }
    }
}

/// Operations the host and plugins perform on the map.
pub trait MapBackend: Send + Sync {
    /// Apply the initial view and rendering hint.
    fn configure(&self, view: &ViewConfig, prefer_canvas: bool);

    /// Register a shell as a floating control over the map.
    fn add_control(&self, shell: ShellId, options: &Properties);

    /// Add a layer to the map and the layer switcher.
    fn add_layer(&self, layer: MapLayer, name: &str, kind: LayerKind, active: bool);

    /// Remove a layer by ID.
    fn remove_layer(&self, layer_id: &str);

    /// Enable or disable drag, zoom and double-click gestures.
    fn set_gestures_enabled(&self, enabled: bool);
}

/// A registered layer in [`HeadlessMap`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerEntry {
    pub layer: MapLayer,
    pub name: String,
    pub kind: LayerKind,
    pub active: bool,
}

#[derive(Debug)]
struct HeadlessState {
    view: Option<ViewConfig>,
    prefer_canvas: bool,
    controls: Vec<(ShellId, Properties)>,
    layers: HashMap<String, LayerEntry>,
    gestures_enabled: bool,
}

/// Map backend without a renderer.
///
/// Keeps everything the host asked for, for inspection and dry runs.
#[derive(Debug)]
pub struct HeadlessMap {
    state: RwLock<HeadlessState>,
}

impl HeadlessMap {
    /// Create an unconfigured map.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HeadlessState {
                view: None,
                prefer_canvas: false,
                controls: Vec::new(),
                layers: HashMap::new(),
                gestures_enabled: true,
            }),
        }
    }

    /// Applied view.
    pub fn view(&self) -> Option<ViewConfig> {
        self.state.read().view.clone()
    }

    /// Applied rendering hint.
    pub fn prefers_canvas(&self) -> bool {
        self.state.read().prefer_canvas
    }

    /// Registered controls in registration order.
    pub fn controls(&self) -> Vec<ShellId> {
        self.state.read().controls.iter().map(|(id, _)| *id).collect()
    }

    /// Layer by ID.
    pub fn layer(&self, layer_id: &str) -> Option<LayerEntry> {
        self.state.read().layers.get(layer_id).cloned()
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.state.read().layers.len()
    }

    /// Whether gestures are enabled.
    pub fn gestures_enabled(&self) -> bool {
        self.state.read().gestures_enabled
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MapBackend for HeadlessMap {
    fn configure(&self, view: &ViewConfig, prefer_canvas: bool) {
        let mut state = self.state.write();
        state.view = Some(view.clone());
        state.prefer_canvas = prefer_canvas;
    }

    fn add_control(&self, shell: ShellId, options: &Properties) {
        self.state.write().controls.push((shell, options.clone()));
    }

    fn add_layer(&self, layer: MapLayer, name: &str, kind: LayerKind, active: bool) {
        let entry = LayerEntry {
            layer: layer.clone(),
            name: name.to_string(),
            kind,
            active,
        };
        self.state.write().layers.insert(layer.id, entry);
    }

    fn remove_layer(&self, layer_id: &str) {
        self.state.write().layers.remove(layer_id);
    }

    fn set_gestures_enabled(&self, enabled: bool) {
        self.state.write().gestures_enabled = enabled;
    }
}
