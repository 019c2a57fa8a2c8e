//! Visual effect strategies for presenter transitions.
//!
//! A strategy runs the stage mutation of a transition. The mutation always
//! happens synchronously inside [`VisualEffect::run`]; only the returned
//! handle differs, resolving when the visual animation has settled.

use crate::config::TransitionMode;
use crate::core::InstanceId;
use crate::layout::stage::Stage;
use crate::presenter::style::{self, StyleGuard};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, warn};

/// Transition name shared by every large-view animation.
pub const LARGE_VIEW_TRANSITION: &str = "large-view";

/// Completion handle of a transition.
pub struct TransitionHandle {
    finished: BoxFuture<'static, ()>,
}

impl TransitionHandle {
    /// A transition that has already settled.
    pub fn completed() -> Self {
        Self {
            finished: futures::future::ready(()).boxed(),
        }
    }

    /// Wrap a future that resolves when the animation settles.
    pub fn pending(finished: BoxFuture<'static, ()>) -> Self {
        Self { finished }
    }

    /// Wait for the animation to settle.
    pub async fn finished(self) {
        self.finished.await
    }
}

impl std::fmt::Debug for TransitionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransitionHandle")
    }
}

/// Runs a stage mutation with or without animation.
pub trait VisualEffect: Send + Sync {
    fn run(
        &self,
        stage: &Arc<Mutex<Stage>>,
        subject: InstanceId,
        mutation: &mut dyn FnMut(&mut Stage),
    ) -> TransitionHandle;
}

/// Applies the mutation with no animation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl VisualEffect for Immediate {
    fn run(
        &self,
        stage: &Arc<Mutex<Stage>>,
        _subject: InstanceId,
        mutation: &mut dyn FnMut(&mut Stage),
    ) -> TransitionHandle {
        mutation(&mut stage.lock());
        TransitionHandle::completed()
    }
}

/// Cross-fades the subject between its old and new container.
///
/// The subject carries the transition name from just before the mutation
/// until the animation settles. Holds the transition style rule for as
/// long as the strategy lives.
#[derive(Debug)]
pub struct CrossFade {
    duration: Duration,
    _style: StyleGuard,
}

impl CrossFade {
    /// Create a cross-fade of the given duration.
    pub fn new(duration: Duration) -> Self {
        let css = style::cross_fade_css(LARGE_VIEW_TRANSITION, duration.as_millis() as u64);
        Self {
            duration,
            _style: style::install(LARGE_VIEW_TRANSITION, &css),
        }
    }

    /// Animation duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl VisualEffect for CrossFade {
    fn run(
        &self,
        stage: &Arc<Mutex<Stage>>,
        subject: InstanceId,
        mutation: &mut dyn FnMut(&mut Stage),
    ) -> TransitionHandle {
        let generation = {
            let mut stage = stage.lock();
            let generation = stage.mark_transition(subject, LARGE_VIEW_TRANSITION);
            mutation(&mut stage);
            generation
        };

        // Without a runtime there is nothing to animate on.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            stage.lock().clear_transition(subject, generation);
            return TransitionHandle::completed();
        };

        let stage = Arc::clone(stage);
        let duration = self.duration;
        let settle = runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            // A later transition of the same subject owns the marker now.
            let cleared = stage.lock().clear_transition(subject, generation);
            trace!(%subject, generation, cleared, "Transition settled");
        });
        TransitionHandle::pending(
            async move {
                if let Err(err) = settle.await {
                    warn!(%subject, error = %err, "Transition settle task failed");
                }
            }
            .boxed(),
        )
    }
}

/// Build the strategy for a transition mode.
pub fn effect_for(mode: &TransitionMode) -> Arc<dyn VisualEffect> {
    match mode {
        TransitionMode::Immediate => Arc::new(Immediate),
        TransitionMode::CrossFade { duration_ms } => {
            Arc::new(CrossFade::new(Duration::from_millis(*duration_ms)))
        }
    }
}
