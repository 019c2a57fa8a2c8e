//! Layout Module
//!
//! Where plugin instances live on screen:
//! - Stage model (hidden pool, shells, overlay)
//! - Container placement
//! - Map backend seam

pub mod map;
pub mod placement;
pub mod stage;

pub use map::{HeadlessMap, LayerKind, MapBackend, MapLayer};
pub use placement::place;
pub use stage::{ContainerId, Shell, ShellId, ShellKind, Stage};
