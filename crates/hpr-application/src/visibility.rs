//! One-shot "became visible" trigger.
//!
//! The host (whatever renders the section) reports visibility changes of the
//! observed container; the trigger fires the first time the visible fraction
//! reaches its threshold and never again.

use hpr_core::error::{HprError, Result};

/// Lifecycle of a [`VisibilityTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No container is being observed yet.
    NotArmed,
    /// The container is rendered and observed.
    Watching,
    /// The trigger has fired.
    Fired,
    /// Observation was torn down before firing.
    Detached,
}

type Callback = Box<dyn FnOnce() + Send>;

/// Fires at most once, the first time an observed container is at least
/// `threshold` visible.
pub struct VisibilityTrigger {
    threshold: f64,
    state: TriggerState,
    callback: Option<Callback>,
}

impl VisibilityTrigger {
    /// Creates an unarmed trigger. `threshold` must be within `0.0..=1.0`.
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(HprError::config(format!(
                "visibility threshold must be within 0.0..=1.0, got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            state: TriggerState::NotArmed,
            callback: None,
        })
    }

    /// Runs `callback` when the trigger fires.
    pub fn with_callback(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn has_fired(&self) -> bool {
        self.state == TriggerState::Fired
    }

    /// Starts observing: the container has been rendered.
    ///
    /// Has no effect once the trigger has fired or been detached.
    pub fn attach(&mut self) {
        if self.state == TriggerState::NotArmed {
            self.state = TriggerState::Watching;
        }
    }

    /// Reports the container's current visible fraction.
    ///
    /// Returns `true` only on the call that fires the trigger. Reports while
    /// unarmed, after firing, or after detaching are ignored.
    pub fn observe(&mut self, visible_fraction: f64) -> bool {
        if self.state != TriggerState::Watching {
            return false;
        }
        // A zero threshold still needs the container to intersect at all.
        if !(visible_fraction > 0.0 && visible_fraction >= self.threshold) {
            return false;
        }

        self.state = TriggerState::Fired;
        tracing::debug!(
            threshold = self.threshold,
            visible_fraction,
            "Visibility trigger fired"
        );
        if let Some(callback) = self.callback.take() {
            callback();
        }
        true
    }

    /// Stops observing (the container is being torn down).
    pub fn detach(&mut self) {
        if self.state != TriggerState::Fired {
            self.state = TriggerState::Detached;
        }
        self.callback = None;
    }
}

impl std::fmt::Debug for VisibilityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
