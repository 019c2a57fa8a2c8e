//! Plugin definitions.
//!
//! The declarative descriptor of one plugin in the host configuration.

use crate::core::Properties;
use serde::{Deserialize, Serialize};

/// Layout target a plugin is placed into.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerKind {
    /// Off-screen holding area
    Hidden,
    /// Floating item over the map
    Main,
    /// Item in the sidebar list
    Sidebar,
    /// Anything else; such plugins are created but never placed
    Unknown(String),
}

impl From<String> for ContainerKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "hidden" => ContainerKind::Hidden,
            "main" => ContainerKind::Main,
            "sidebar" => ContainerKind::Sidebar,
            _ => ContainerKind::Unknown(kind),
        }
    }
}

impl From<ContainerKind> for String {
    fn from(kind: ContainerKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Hidden => write!(f, "hidden"),
            ContainerKind::Main => write!(f, "main"),
            ContainerKind::Sidebar => write!(f, "sidebar"),
            ContainerKind::Unknown(kind) => write!(f, "{}", kind),
        }
    }
}

/// Declarative plugin descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDefinition {
    /// Component name the plugin resolves to
    pub import: String,
    /// Placement target
    pub container: ContainerKind,
    /// Presentation properties for the wrapping shell
    #[serde(default)]
    pub container_props: Properties,
    /// Plugin-specific properties
    #[serde(default)]
    pub props: Properties,
}

impl PluginDefinition {
    /// Create a definition without properties.
    pub fn new(import: &str, container: ContainerKind) -> Self {
        Self {
            import: import.to_string(),
            container,
            container_props: Properties::new(),
            props: Properties::new(),
        }
    }

    /// Set a plugin property.
    pub fn with_prop(mut self, key: &str, value: serde_json::Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }

    /// Set a shell property.
    pub fn with_container_prop(mut self, key: &str, value: serde_json::Value) -> Self {
        self.container_props.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_kind_parse() {
        let kinds: Vec<ContainerKind> =
            serde_json::from_value(json!(["hidden", "main", "sidebar", "footer"])).unwrap();
        assert_eq!(
            kinds,
            vec![
                ContainerKind::Hidden,
                ContainerKind::Main,
                ContainerKind::Sidebar,
                ContainerKind::Unknown("footer".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_kind_serializes_verbatim() {
        let value = serde_json::to_value(ContainerKind::Unknown("footer".to_string())).unwrap();
        assert_eq!(value, json!("footer"));
    }

    #[test]
    fn test_definition_defaults() {
        let def: PluginDefinition =
            serde_json::from_value(json!({ "import": "legend", "container": "main" })).unwrap();
        assert!(def.props.is_empty());
        assert!(def.container_props.is_empty());
    }

    #[test]
    fn test_definition_builder() {
        let def = PluginDefinition::new("legend", ContainerKind::Main)
            .with_prop("unit", json!("m"))
            .with_container_prop("title", json!("Legend"));
        assert_eq!(def.props.get("unit"), Some(&json!("m")));
        assert_eq!(def.container_props.get("title"), Some(&json!("Legend")));
    }
}
