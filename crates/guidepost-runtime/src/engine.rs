#![forbid(unsafe_code)]

//! The walkthrough engine: explicit owner of session, tracker and host.
//!
//! Every transition runs the same pipeline:
//!
//! 1. the [`TutorialSession`] changes state;
//! 2. the [`SpotlightTracker`] tears down the old step's listeners and
//!    re-resolves the new step's anchor;
//! 3. the tooltip [`place`]ment is recomputed from the new rectangle.
//!
//! Host events run steps 2 (measurement only) and 3. A renderer reads the
//! result through [`Walkthrough::snapshot`] once per frame.
//!
//! # Example
//!
//! ```
//! use guidepost_core::builtin::{self, GETTING_STARTED};
//! use guidepost_core::geometry::Size;
//! use guidepost_runtime::engine::Walkthrough;
//! use guidepost_runtime::headless::HeadlessHost;
//! use guidepost_runtime::storage::MemoryStore;
//!
//! let catalog = builtin::builtin().unwrap();
//! let host = HeadlessHost::new(Size::new(1280.0, 800.0));
//! let mut engine = Walkthrough::new(catalog, MemoryStore::new(), host);
//!
//! engine.start(GETTING_STARTED);
//! assert_eq!(engine.current_step().unwrap().id, "welcome");
//! assert!(engine.placement().is_centered());
//! ```

use guidepost_core::catalog::{Catalog, CatalogError};
use guidepost_core::geometry::{Rect, Size};
use guidepost_core::placement::{PlacementStyle, place};
use guidepost_core::tutorial::{Step, Tutorial};
use serde::Serialize;

use crate::completion::CompletionStore;
use crate::config::EngineConfig;
use crate::host::{Host, HostEvent};
use crate::session::{SessionEvent, SessionState, TutorialSession};
use crate::storage::KeyValueStore;
use crate::tracker::SpotlightTracker;

/// Failure constructing an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine config: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot<'a> {
    pub tutorial: &'a Tutorial,
    pub step: &'a Step,
    pub step_index: usize,
    pub step_count: usize,
    pub progress: f64,
    pub spotlight: Option<Rect>,
    pub placement: PlacementStyle,
    pub viewport: Size,
}

/// Guided walkthrough engine.
pub struct Walkthrough<H: Host, S: KeyValueStore> {
    host: H,
    session: TutorialSession<S>,
    tracker: SpotlightTracker,
    config: EngineConfig,
    placement: PlacementStyle,
}

impl<H: Host, S: KeyValueStore> Walkthrough<H, S> {
    /// Create an engine with the default configuration.
    pub fn new(catalog: Catalog, store: S, host: H) -> Self {
        Self::build(catalog, store, host, EngineConfig::default())
    }

    /// Create an engine with `config`, rejecting invalid values.
    pub fn with_config(
        catalog: Catalog,
        store: S,
        host: H,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(EngineError::InvalidConfig(errors));
        }
        Ok(Self::build(catalog, store, host, config))
    }

    /// Create an engine over the shipped tutorials.
    pub fn builtin(store: S, host: H) -> Result<Self, EngineError> {
        Ok(Self::new(guidepost_core::builtin::builtin()?, store, host))
    }

    fn build(catalog: Catalog, store: S, host: H, config: EngineConfig) -> Self {
        let completion = CompletionStore::load_with_key(store, config.storage_key.as_str());
        let tracker = SpotlightTracker::new(config.spotlight_padding, config.poll_interval());
        Self {
            host,
            session: TutorialSession::new(catalog, completion),
            tracker,
            config,
            placement: PlacementStyle::Centered,
        }
    }

    // --- Transitions -------------------------------------------------------

    /// Start a tutorial. Unknown ids are ignored.
    pub fn start(&mut self, tutorial_id: &str) -> Option<SessionEvent> {
        let event = self.session.start(tutorial_id);
        self.after_transition(event)
    }

    /// Advance; finishes the tutorial on the last step.
    pub fn next(&mut self) -> Option<SessionEvent> {
        let event = self.session.next();
        self.after_transition(event)
    }

    pub fn prev(&mut self) -> Option<SessionEvent> {
        let event = self.session.prev();
        self.after_transition(event)
    }

    pub fn jump_to(&mut self, index: usize) -> Option<SessionEvent> {
        let event = self.session.jump_to(index);
        self.after_transition(event)
    }

    /// Finish the running tutorial and record it complete.
    pub fn end(&mut self) -> Option<SessionEvent> {
        let event = self.session.end();
        self.after_transition(event)
    }

    /// Leave the running tutorial without recording completion.
    pub fn skip(&mut self) -> Option<SessionEvent> {
        let event = self.session.skip();
        self.after_transition(event)
    }

    fn after_transition(&mut self, event: Option<SessionEvent>) -> Option<SessionEvent> {
        if event.is_some() {
            self.tracker
                .sync(&mut self.host, self.session.current_step());
            self.update_placement();
        }
        event
    }

    // --- Host events -------------------------------------------------------

    /// Deliver one host callback. Returns whether it caused a re-measure.
    pub fn handle_host_event(&mut self, event: HostEvent) -> bool {
        let measured = self.tracker.handle_event(&self.host, event);
        if measured {
            self.update_placement();
        }
        measured
    }

    /// Deliver a batch of host callbacks in order. Returns how many caused
    /// a re-measure.
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = HostEvent>) -> usize {
        events
            .into_iter()
            .filter(|&event| self.handle_host_event(event))
            .count()
    }

    fn update_placement(&mut self) {
        self.placement = match self.session.current_step() {
            Some(step) => place(
                self.tracker.rect(),
                step.effective_position(),
                self.host.viewport(),
                &self.config.placement,
            ),
            None => PlacementStyle::Centered,
        };
    }

    // --- Observation -------------------------------------------------------

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &TutorialSession<S> {
        &self.session
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.session.current_step()
    }

    pub fn progress_fraction(&self) -> Option<f64> {
        self.session.progress_fraction()
    }

    /// Latest spotlight rectangle; `None` when there is nothing to
    /// highlight.
    pub fn spotlight(&self) -> Option<Rect> {
        self.tracker.rect()
    }

    pub fn placement(&self) -> PlacementStyle {
        self.placement
    }

    pub fn is_complete(&self, tutorial_id: &str) -> bool {
        self.session.is_complete(tutorial_id)
    }

    pub fn catalog(&self) -> &Catalog {
        self.session.catalog()
    }

    pub fn completion(&self) -> &CompletionStore<S> {
        self.session.completion()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SpotlightTracker {
        &self.tracker
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for adapters (feeding input, moving elements).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Frame data for the renderer, `None` when idle.
    pub fn snapshot(&self) -> Option<RenderSnapshot<'_>> {
        let tutorial = self.session.active_tutorial()?;
        let step_index = self.session.step_index()?;
        let step = tutorial.steps.get(step_index)?;
        Some(RenderSnapshot {
            tutorial,
            step,
            step_index,
            step_count: tutorial.step_count(),
            progress: self.session.progress_fraction()?,
            spotlight: self.tracker.rect(),
            placement: self.placement,
            viewport: self.host.viewport(),
        })
    }
}

impl<H: Host, S: KeyValueStore> Drop for Walkthrough<H, S> {
    fn drop(&mut self) {
        self.tracker.deactivate(&mut self.host);
    }
}

impl<H: Host + core::fmt::Debug, S: KeyValueStore + core::fmt::Debug> core::fmt::Debug
    for Walkthrough<H, S>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walkthrough")
            .field("state", self.session.state())
            .field("spotlight", &self.tracker.rect())
            .field("placement", &self.placement)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
