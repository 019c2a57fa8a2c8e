//! Layout stage.
//!
//! Abstract model of where each plugin instance currently lives: the hidden
//! pool, a shell (main or sidebar item), or the large-view overlay. Moving
//! an instance always detaches it from its previous container first.

use crate::core::{InstanceId, Properties};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shell identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShellId(pub usize);

impl std::fmt::Display for ShellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shell-{}", self.0)
    }
}

/// Kind of shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellKind {
    /// Floating over the map
    Main,
    /// Listed in the sidebar
    Sidebar,
}

/// A container an instance can live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerId {
    /// Off-screen holding area
    Hidden,
    /// Header/controls wrapper
    Shell(ShellId),
    /// Large-view overlay
    Overlay,
}

/// Header/controls wrapper around one plugin.
#[derive(Clone, Debug)]
pub struct Shell {
    /// Shell ID
    pub id: ShellId,
    /// Kind
    pub kind: ShellKind,
    /// Header text
    pub header: Option<String>,
    /// Presentation properties
    pub properties: Properties,
    /// Wrapped instances
    children: Vec<InstanceId>,
}

impl Shell {
    /// Wrapped instances.
    pub fn children(&self) -> &[InstanceId] {
        &self.children
    }
}

/// Placement of every instance.
#[derive(Debug, Default)]
pub struct Stage {
    hidden: Vec<InstanceId>,
    shells: Vec<Shell>,
    sidebar: Vec<ShellId>,
    overlay: Vec<InstanceId>,
    /// View-transition names currently set on instances, with the mark generation
    transition_names: HashMap<InstanceId, (String, u64)>,
    generation: u64,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shell. Sidebar shells are appended to the sidebar list.
    pub fn add_shell(&mut self, kind: ShellKind, header: Option<String>, properties: Properties) -> ShellId {
        let id = ShellId(self.shells.len());
        self.shells.push(Shell {
            id,
            kind,
            header,
            properties,
            children: Vec::new(),
        });
        if kind == ShellKind::Sidebar {
            self.sidebar.push(id);
        }
        id
    }

    /// Shell by ID.
    pub fn shell(&self, id: ShellId) -> Option<&Shell> {
        self.shells.get(id.0)
    }

    /// All shells in creation order.
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    /// Sidebar shells in order.
    pub fn sidebar(&self) -> &[ShellId] {
        &self.sidebar
    }

    /// Children of a container.
    pub fn children(&self, container: ContainerId) -> &[InstanceId] {
        match container {
            ContainerId::Hidden => &self.hidden,
            ContainerId::Overlay => &self.overlay,
            ContainerId::Shell(id) => self.shell(id).map(|s| s.children()).unwrap_or(&[]),
        }
    }

    /// Container an instance currently lives in.
    pub fn parent_of(&self, instance: InstanceId) -> Option<ContainerId> {
        if self.hidden.contains(&instance) {
            return Some(ContainerId::Hidden);
        }
        if self.overlay.contains(&instance) {
            return Some(ContainerId::Overlay);
        }
        self.shells
            .iter()
            .find(|s| s.children.contains(&instance))
            .map(|s| ContainerId::Shell(s.id))
    }

    /// Shell an instance was wrapped in, if it is still there.
    pub fn shell_of(&self, instance: InstanceId) -> Option<ShellId> {
        match self.parent_of(instance) {
            Some(ContainerId::Shell(id)) => Some(id),
            _ => None,
        }
    }

    /// Move an instance to the end of a container.
    ///
    /// Returns `false` if the container does not exist.
    pub fn append(&mut self, container: ContainerId, instance: InstanceId) -> bool {
        if !self.contains(container) {
            return false;
        }
        self.detach(instance);
        if let Some(children) = self.children_mut(container) {
            children.push(instance);
        }
        true
    }

    /// Make an instance the only child of a container.
    pub fn replace_children(&mut self, container: ContainerId, instance: InstanceId) -> bool {
        if !self.contains(container) {
            return false;
        }
        self.detach(instance);
        if let Some(children) = self.children_mut(container) {
            children.clear();
            children.push(instance);
        }
        true
    }

    /// Remove an instance from wherever it lives.
    pub fn detach(&mut self, instance: InstanceId) {
        self.hidden.retain(|id| *id != instance);
        self.overlay.retain(|id| *id != instance);
        for shell in &mut self.shells {
            shell.children.retain(|id| *id != instance);
        }
    }

    /// Set the transition name of an instance.
    ///
    /// Returns the generation of this mark. Only that generation may clear it.
    pub fn mark_transition(&mut self, instance: InstanceId, name: &str) -> u64 {
        self.generation += 1;
        self.transition_names
            .insert(instance, (name.to_string(), self.generation));
        self.generation
    }

    /// Clear a transition name if it is still the mark of `generation`.
    pub fn clear_transition(&mut self, instance: InstanceId, generation: u64) -> bool {
        match self.transition_names.get(&instance) {
            Some((_, current)) if *current == generation => {
                self.transition_names.remove(&instance);
                true
            }
            _ => false,
        }
    }

    /// Transition name of an instance.
    pub fn transition_name(&self, instance: InstanceId) -> Option<&str> {
        self.transition_names
            .get(&instance)
            .map(|(name, _)| name.as_str())
    }

    fn contains(&self, container: ContainerId) -> bool {
        match container {
            ContainerId::Shell(id) => id.0 < self.shells.len(),
            ContainerId::Hidden | ContainerId::Overlay => true,
        }
    }

    fn children_mut(&mut self, container: ContainerId) -> Option<&mut Vec<InstanceId>> {
        match container {
            ContainerId::Hidden => Some(&mut self.hidden),
            ContainerId::Overlay => Some(&mut self.overlay),
            ContainerId::Shell(id) => self.shells.get_mut(id.0).map(|s| &mut s.children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_moves_instance() {
        let mut stage = Stage::new();
        let shell = stage.add_shell(ShellKind::Main, Some("Legend".to_string()), Properties::new());
        let id = InstanceId::new();

        assert!(stage.append(ContainerId::Hidden, id));
        assert_eq!(stage.parent_of(id), Some(ContainerId::Hidden));

        assert!(stage.append(ContainerId::Shell(shell), id));
        assert_eq!(stage.parent_of(id), Some(ContainerId::Shell(shell)));
        assert!(stage.children(ContainerId::Hidden).is_empty());
    }

    #[test]
    fn test_unknown_shell_is_rejected() {
        let mut stage = Stage::new();
        let id = InstanceId::new();
        assert!(!stage.append(ContainerId::Shell(ShellId(7)), id));
        assert_eq!(stage.parent_of(id), None);
    }

    #[test]
    fn test_replace_children() {
        let mut stage = Stage::new();
        let (a, b) = (InstanceId::new(), InstanceId::new());
        stage.append(ContainerId::Hidden, a);
        stage.append(ContainerId::Overlay, b);

        stage.replace_children(ContainerId::Hidden, b);

        assert_eq!(stage.children(ContainerId::Hidden), &[b]);
        assert!(stage.children(ContainerId::Overlay).is_empty());
        assert_eq!(stage.parent_of(a), None);
    }

    #[test]
    fn test_sidebar_order() {
        let mut stage = Stage::new();
        let main = stage.add_shell(ShellKind::Main, None, Properties::new());
        let first = stage.add_shell(ShellKind::Sidebar, None, Properties::new());
        let second = stage.add_shell(ShellKind::Sidebar, None, Properties::new());
        assert_eq!(stage.sidebar(), &[first, second]);
        assert_eq!(stage.shell(main).unwrap().kind, ShellKind::Main);
    }

    #[test]
    fn test_transition_names() {
        let mut stage = Stage::new();
        let id = InstanceId::new();
        let first = stage.mark_transition(id, "large-view");
        assert_eq!(stage.transition_name(id), Some("large-view"));

        let second = stage.mark_transition(id, "large-view");
        assert!(!stage.clear_transition(id, first));
        assert_eq!(stage.transition_name(id), Some("large-view"));

        assert!(stage.clear_transition(id, second));
        assert_eq!(stage.transition_name(id), None);
    }
}
