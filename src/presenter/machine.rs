//! Large-view presentation state machine.
//!
//! At most one plugin is enlarged at a time. `present` only acts from
//! `Idle`; `dismiss` only acts from `Presenting`. Both run their stage
//! mutation through the configured [`VisualEffect`].

use crate::core::{now, InstanceId, Timestamp};
use crate::layout::stage::{ContainerId, Stage};
use crate::presenter::effect::{TransitionHandle, VisualEffect};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// The plugin currently shown in the large view.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Header shown above the enlarged plugin
    pub header: Option<String>,
    /// Presented instance
    pub instance: InstanceId,
    /// Container the instance is returned to on dismiss
    pub original_container: ContainerId,
    /// When the presentation started
    pub since: Timestamp,
}

/// Presenter state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenterState {
    /// Nothing enlarged
    Idle,
    /// The instance is enlarged
    Presenting(InstanceId),
}

/// Large-view presenter.
pub struct LargePresenter {
    current: Mutex<Option<Presentation>>,
    effect: Arc<dyn VisualEffect>,
}

impl LargePresenter {
    /// Create an idle presenter.
    pub fn new(effect: Arc<dyn VisualEffect>) -> Self {
        Self {
            current: Mutex::new(None),
            effect,
        }
    }

    /// Enlarge an instance.
    ///
    /// Does nothing (returns `None`) while another presentation is active
    /// or when the instance is not placed anywhere.
    pub fn present(
        &self,
        stage: &Arc<Mutex<Stage>>,
        instance: InstanceId,
        header: Option<String>,
    ) -> Option<TransitionHandle> {
        let mut current = self.current.lock();
        if let Some(active) = current.as_ref() {
            debug!(active = %active.instance, requested = %instance, "Large view busy, ignoring present");
            return None;
        }

        let original_container = match stage.lock().parent_of(instance) {
            Some(ContainerId::Overlay) | None => {
                debug!(%instance, "Instance has no container to present from");
                return None;
            }
            Some(container) => container,
        };

        let handle = self.effect.run(stage, instance, &mut |stage: &mut Stage| {
            stage.append(ContainerId::Overlay, instance);
        });
        *current = Some(Presentation {
            header,
            instance,
            original_container,
            since: now(),
        });
        info!(%instance, ?original_container, "Presenting in large view");
        Some(handle)
    }

    /// Return the enlarged instance to its original container.
    ///
    /// The original container's children are replaced by the instance.
    /// Does nothing (returns `None`) when idle.
    pub fn dismiss(&self, stage: &Arc<Mutex<Stage>>) -> Option<TransitionHandle> {
        let mut current = self.current.lock();
        let presentation = current.take()?;

        let handle = self.effect.run(stage, presentation.instance, &mut |stage: &mut Stage| {
            stage.replace_children(presentation.original_container, presentation.instance);
        });
        info!(instance = %presentation.instance, "Large view dismissed");
        Some(handle)
    }

    /// Current state.
    pub fn state(&self) -> PresenterState {
        match self.current.lock().as_ref() {
            Some(p) => PresenterState::Presenting(p.instance),
            None => PresenterState::Idle,
        }
    }

    /// Current presentation.
    pub fn current(&self) -> Option<Presentation> {
        self.current.lock().clone()
    }

    /// Whether the given instance is enlarged.
    pub fn is_presenting(&self, instance: InstanceId) -> bool {
        self.state() == PresenterState::Presenting(instance)
    }
}
