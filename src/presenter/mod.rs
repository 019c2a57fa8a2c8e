//! Presenter Module
//!
//! Large-view presentation of a single plugin:
//! - Presentation state machine
//! - Visual effect strategies (immediate, cross-fade)
//! - Process-wide transition styles

pub mod effect;
pub mod machine;
pub mod style;

pub use effect::{effect_for, CrossFade, Immediate, TransitionHandle, VisualEffect};
pub use machine::{LargePresenter, Presentation, PresenterState};
pub use style::StyleGuard;
