//! Container placement.
//!
//! Puts each plugin instance into the container its definition names.

use crate::core::InstanceId;
use crate::layout::map::MapBackend;
use crate::layout::stage::{ContainerId, ShellKind, Stage};
use crate::plugin::definition::{ContainerKind, PluginDefinition};
use crate::plugin::interface::Plugin;
use tracing::debug;

/// Place an instance according to its definition.
///
/// Main shells are also registered as map controls. Unknown container
/// kinds are dropped and `None` is returned.
pub fn place(
    stage: &mut Stage,
    map: &dyn MapBackend,
    definition: &PluginDefinition,
    instance_id: InstanceId,
    plugin: &dyn Plugin,
) -> Option<ContainerId> {
    let kind = match &definition.container {
        ContainerKind::Hidden => {
            stage.append(ContainerId::Hidden, instance_id);
            return Some(ContainerId::Hidden);
        }
        ContainerKind::Main => ShellKind::Main,
        ContainerKind::Sidebar => ShellKind::Sidebar,
        ContainerKind::Unknown(kind) => {
            debug!(import = %definition.import, container = %kind, "Unknown container, plugin not placed");
            return None;
        }
    };

    let header = plugin.header_text();
    let shell = stage.add_shell(kind, header, definition.container_props.clone());
    stage.append(ContainerId::Shell(shell), instance_id);
    if kind == ShellKind::Main {
        map.add_control(shell, &definition.container_props);
    }
    debug!(import = %definition.import, %shell, ?kind, "Placed plugin");
    Some(ContainerId::Shell(shell))
}

/// Pointer entered or left a shell.
///
/// Map gestures are suspended while the pointer is over a shell so the
/// shell's own interactions are not taken over by the map.
pub fn hover(map: &dyn MapBackend, entered: bool) {
    map.set_gestures_enabled(!entered);
}
