#![forbid(unsafe_code)]

//! Tutorial session state machine.
//!
//! # States
//!
//! - `Idle`
//! - `Active { tutorial_id, step_index }` with `step_index < step_count`
//!
//! # Transitions
//!
//! | from | op | to |
//! |------|----|----|
//! | any | `start(known)` | `Active{id, 0}`, previous run discarded, not completed |
//! | any | `start(unknown)` | unchanged |
//! | `Active`, not last | `next` | `Active{id, i+1}` |
//! | `Active`, last | `next` | same as `end` |
//! | `Active`, `i > 0` | `prev` | `Active{id, i-1}` |
//! | `Active`, `i == 0` | `prev` | unchanged |
//! | `Active` | `end` | completion recorded, `Idle` |
//! | `Active` | `skip` | `Idle`, nothing recorded |
//! | `Active` | `jump_to(j)` | `Active{id, min(j, last)}` |
//! | `Idle` | anything but `start` | unchanged |
//!
//! Every transition returns `Some(SessionEvent)` when the state changed and
//! `None` otherwise.

use guidepost_core::catalog::Catalog;
use guidepost_core::tutorial::{Step, Tutorial};

use crate::completion::CompletionStore;
use crate::storage::KeyValueStore;

/// Current session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active {
        tutorial_id: String,
        step_index: usize,
    },
}

impl SessionState {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Why the step pointer moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChangeReason {
    Next,
    Prev,
    Jump,
}

/// Observable outcome of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A tutorial started at step 0. `replaced` is the tutorial that was
    /// running before, discarded without completion.
    Started {
        tutorial_id: String,
        replaced: Option<String>,
    },
    StepChanged {
        tutorial_id: String,
        from: usize,
        to: usize,
        reason: StepChangeReason,
    },
    /// The tutorial ended and was recorded complete. `newly_completed` is
    /// false when it had already been completed on an earlier run.
    Finished {
        tutorial_id: String,
        newly_completed: bool,
    },
    Skipped {
        tutorial_id: String,
        step_index: usize,
    },
}

/// The step state machine plus the completion record it writes to.
#[derive(Debug)]
pub struct TutorialSession<S> {
    catalog: Catalog,
    completion: CompletionStore<S>,
    state: SessionState,
}

impl<S: KeyValueStore> TutorialSession<S> {
    pub fn new(catalog: Catalog, completion: CompletionStore<S>) -> Self {
        Self {
            catalog,
            completion,
            state: SessionState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn completion(&self) -> &CompletionStore<S> {
        &self.completion
    }

    pub fn completion_mut(&mut self) -> &mut CompletionStore<S> {
        &mut self.completion
    }

    #[inline]
    pub fn is_complete(&self, tutorial_id: &str) -> bool {
        self.completion.is_complete(tutorial_id)
    }

    /// The running tutorial, if any.
    pub fn active_tutorial(&self) -> Option<&Tutorial> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Active { tutorial_id, .. } => self.catalog.get(tutorial_id),
        }
    }

    pub fn step_index(&self) -> Option<usize> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Active { step_index, .. } => Some(step_index),
        }
    }

    /// Number of steps in the running tutorial; 0 when idle.
    pub fn step_count(&self) -> usize {
        self.active_tutorial().map_or(0, Tutorial::step_count)
    }

    pub fn current_step(&self) -> Option<&Step> {
        let index = self.step_index()?;
        self.active_tutorial()?.steps.get(index)
    }

    /// `(step_index + 1) / step_count`, `None` when idle.
    pub fn progress_fraction(&self) -> Option<f64> {
        let index = self.step_index()?;
        let count = self.step_count();
        (count > 0).then(|| (index + 1) as f64 / count as f64)
    }

    /// Start `tutorial_id` from its first step.
    ///
    /// Unknown ids leave the session untouched.
    pub fn start(&mut self, tutorial_id: &str) -> Option<SessionEvent> {
        if !self.catalog.contains(tutorial_id) {
            tracing::debug!(tutorial = tutorial_id, "start ignored: unknown tutorial");
            return None;
        }
        let replaced = match std::mem::take(&mut self.state) {
            SessionState::Active { tutorial_id, .. } => Some(tutorial_id),
            SessionState::Idle => None,
        };
        if let Some(prev) = &replaced {
            tracing::debug!(tutorial = %prev, "discarding running tutorial");
        }
        self.state = SessionState::Active {
            tutorial_id: tutorial_id.to_owned(),
            step_index: 0,
        };
        tracing::debug!(tutorial = tutorial_id, "tutorial started");
        Some(SessionEvent::Started {
            tutorial_id: tutorial_id.to_owned(),
            replaced,
        })
    }

    /// Advance one step; on the last step this finishes the tutorial.
    pub fn next(&mut self) -> Option<SessionEvent> {
        let index = self.step_index()?;
        if index >= self.last_index()? {
            return self.end();
        }
        self.move_to(index + 1, StepChangeReason::Next)
    }

    /// Go back one step. No-op on the first step.
    pub fn prev(&mut self) -> Option<SessionEvent> {
        let index = self.step_index()?;
        if index == 0 {
            return None;
        }
        self.move_to(index - 1, StepChangeReason::Prev)
    }

    /// Jump to `index`, clamped to the last step.
    pub fn jump_to(&mut self, index: usize) -> Option<SessionEvent> {
        let current = self.step_index()?;
        let target = index.min(self.last_index()?);
        if target == current {
            return None;
        }
        self.move_to(target, StepChangeReason::Jump)
    }

    /// Record the running tutorial complete and go idle.
    pub fn end(&mut self) -> Option<SessionEvent> {
        let SessionState::Active { tutorial_id, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let newly_completed = match self.completion.mark_complete(&tutorial_id) {
            Ok(newly) => newly,
            Err(err) => {
                tracing::warn!(tutorial = %tutorial_id, error = %err, "failed to persist completion");
                true
            }
        };
        tracing::debug!(tutorial = %tutorial_id, newly_completed, "tutorial finished");
        Some(SessionEvent::Finished {
            tutorial_id,
            newly_completed,
        })
    }

    /// Abandon the running tutorial without recording completion.
    pub fn skip(&mut self) -> Option<SessionEvent> {
        let SessionState::Active {
            tutorial_id,
            step_index,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        tracing::debug!(tutorial = %tutorial_id, step_index, "tutorial skipped");
        Some(SessionEvent::Skipped {
            tutorial_id,
            step_index,
        })
    }

    fn last_index(&self) -> Option<usize> {
        self.active_tutorial().map(Tutorial::last_index)
    }

    fn move_to(&mut self, to: usize, reason: StepChangeReason) -> Option<SessionEvent> {
        let SessionState::Active {
            tutorial_id,
            step_index,
        } = &mut self.state
        else {
            return None;
        };
        let from = *step_index;
        *step_index = to;
        tracing::debug!(tutorial = %tutorial_id, from, to, ?reason, "step changed");
        Some(SessionEvent::StepChanged {
            tutorial_id: tutorial_id.clone(),
            from,
            to,
            reason,
        })
    }
}
