#![forbid(unsafe_code)]

//! Spotlight tracking for the active step's anchor.
//!
//! While a step with an anchor is active the tracker owns exactly one
//! *activation*: a resize listener, a scroll listener and a repeating timer.
//! Each of them triggers a re-measure. The timer catches layout changes
//! that raise no event (reflow, late images, animations) at the cost of up
//! to one poll period of latency.
//!
//! # Invariants
//!
//! 1. At most one activation is live. [`sync`](SpotlightTracker::sync)
//!    releases the previous activation before installing a new one, also
//!    when the new step has no anchor.
//! 2. Events whose handle is not part of the live activation are ignored;
//!    a stale timer never updates the rectangle.
//! 3. An anchor that cannot be found yields `rect() == None` until it
//!    reappears or the step changes.
//!
//! The tracker does not hold the host. Callers pass it in, and must call
//! [`deactivate`](SpotlightTracker::deactivate) before dropping the
//! tracker; [`Walkthrough`](crate::engine::Walkthrough) does this on drop.

use std::time::Duration;

use guidepost_core::geometry::Rect;
use guidepost_core::tutorial::Step;

use crate::host::{Host, HostEvent, InterfaceTree, ListenerId, TimerId};

/// Handles installed for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Activation {
    resize: ListenerId,
    scroll: ListenerId,
    timer: TimerId,
}

impl Activation {
    fn owns(&self, event: HostEvent) -> bool {
        match event {
            HostEvent::Resize(id) => id == self.resize,
            HostEvent::Scroll(id) => id == self.scroll,
            HostEvent::Timer(id) => id == self.timer,
        }
    }
}

/// Keeps the spotlight rectangle of the current step fresh.
#[derive(Debug, Clone)]
pub struct SpotlightTracker {
    padding: f64,
    poll_interval: Duration,
    selector: Option<String>,
    activation: Option<Activation>,
    rect: Option<Rect>,
    measurements: u64,
}

impl SpotlightTracker {
    #[must_use]
    pub fn new(padding: f64, poll_interval: Duration) -> Self {
        Self {
            padding,
            poll_interval,
            selector: None,
            activation: None,
            rect: None,
            measurements: 0,
        }
    }

    /// Latest padded anchor rectangle.
    #[inline]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Whether listeners and the poll timer are installed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.activation.is_some()
    }

    /// Selector being tracked.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Total measurements taken since construction.
    #[inline]
    pub fn measurements(&self) -> u64 {
        self.measurements
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Retarget to `step`.
    ///
    /// Always tears down the current activation first. When `step` has an
    /// anchor, installs a fresh activation and measures immediately.
    /// Returns whether the tracker is active afterwards.
    pub fn sync<H: Host>(&mut self, host: &mut H, step: Option<&Step>) -> bool {
        self.deactivate(host);

        let Some(selector) = step.and_then(Step::anchor) else {
            return false;
        };

        let activation = Activation {
            resize: host.subscribe_resize(),
            scroll: host.subscribe_scroll(),
            timer: host.schedule_repeating(self.poll_interval),
        };
        tracing::debug!(
            selector,
            resize = %activation.resize,
            scroll = %activation.scroll,
            timer = %activation.timer,
            "spotlight tracking started"
        );
        self.selector = Some(selector.to_owned());
        self.activation = Some(activation);
        self.measure(&*host);
        true
    }

    /// Release every listener and the timer, and clear the rectangle.
    pub fn deactivate<H: Host>(&mut self, host: &mut H) {
        if let Some(activation) = self.activation.take() {
            host.unsubscribe_resize(activation.resize);
            host.unsubscribe_scroll(activation.scroll);
            host.cancel(activation.timer);
            tracing::debug!(
                selector = self.selector.as_deref().unwrap_or_default(),
                "spotlight tracking stopped"
            );
        }
        self.selector = None;
        self.rect = None;
    }

    /// Handle a host callback. Returns `true` when it triggered a
    /// measurement.
    pub fn handle_event<H: Host>(&mut self, host: &H, event: HostEvent) -> bool {
        match self.activation {
            Some(activation) if activation.owns(event) => {
                self.measure(host);
                true
            }
            _ => {
                tracing::trace!(?event, "ignoring event from inactive subscription");
                false
            }
        }
    }

    fn measure<T: InterfaceTree>(&mut self, tree: &T) {
        let Some(selector) = self.selector.as_deref() else {
            self.rect = None;
            return;
        };
        let _span = tracing::debug_span!("spotlight_measure", selector).entered();

        let rect = tree
            .find(selector)
            .map(|element| tree.bounding_box(&element).inflate(self.padding));
        if rect.is_none() && self.rect.is_some() {
            tracing::debug!(selector, "anchor lost");
        }
        self.rect = rect;
        self.measurements += 1;
    }
}
