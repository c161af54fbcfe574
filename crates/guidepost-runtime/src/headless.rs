#![forbid(unsafe_code)]

//! Deterministic, host-driven [`Host`](crate::host::Host) implementation.
//!
//! Nothing here runs on its own: the caller sets element boxes, advances a
//! manual clock, resizes or scrolls, and receives the [`HostEvent`]s those
//! actions would fire. Feed them to
//! [`Walkthrough::dispatch`](crate::engine::Walkthrough::dispatch).
//!
//! Live listener and timer handles are tracked so leaks are observable.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use guidepost_core::geometry::{Rect, Size};

use crate::host::{
    HostEvent, InterfaceTree, ListenerId, ScrollSource, TimerId, TimerService, ViewportProvider,
};

/// Most firings one timer delivers from a single [`HeadlessHost::advance`].
///
/// Further elapsed periods are coalesced, like a throttled browser
/// interval.
pub const MAX_CATCH_UP: usize = 1_000;

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    period: Duration,
    /// `None` once the next firing is past the end of the clock.
    next_due: Option<Duration>,
}

impl ScheduledTimer {
    /// First due time strictly after `now`, counting whole periods from
    /// `due`.
    fn first_due_after(&self, due: Duration, now: Duration) -> Option<Duration> {
        let period = self.period.as_nanos();
        let elapsed = now.checked_sub(due)?.as_nanos();
        let offset = period.checked_mul(elapsed / period + 1)?;
        let secs = u64::try_from(offset / 1_000_000_000).ok()?;
        // Remainder of a division by 1e9 always fits.
        let nanos = (offset % 1_000_000_000) as u32;
        due.checked_add(Duration::new(secs, nanos))
    }
}

/// Headless host with a manual clock.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    viewport: Size,
    elements: HashMap<String, Rect>,
    now: Duration,
    next_handle: u64,
    resize_listeners: BTreeSet<ListenerId>,
    scroll_listeners: BTreeSet<ListenerId>,
    timers: BTreeMap<TimerId, ScheduledTimer>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: HashMap::new(),
            now: Duration::ZERO,
            next_handle: 1,
            resize_listeners: BTreeSet::new(),
            scroll_listeners: BTreeSet::new(),
            timers: BTreeMap::new(),
        }
    }

    /// Place (or move) the element matched by `selector`.
    pub fn insert_element(&mut self, selector: impl Into<String>, rect: Rect) {
        self.elements.insert(selector.into(), rect);
    }

    /// Remove an element. Returns whether it existed.
    pub fn remove_element(&mut self, selector: &str) -> bool {
        self.elements.remove(selector).is_some()
    }

    /// Resize the viewport, returning the resize events to deliver.
    pub fn set_viewport(&mut self, size: Size) -> Vec<HostEvent> {
        self.viewport = size;
        self.resize_listeners
            .iter()
            .copied()
            .map(HostEvent::Resize)
            .collect()
    }

    /// Scroll the content by `(dx, dy)`; every element moves the opposite
    /// way. Returns the scroll events to deliver.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Vec<HostEvent> {
        for rect in self.elements.values_mut() {
            rect.x -= dx;
            rect.y -= dy;
        }
        self.scroll_listeners
            .iter()
            .copied()
            .map(HostEvent::Scroll)
            .collect()
    }

    /// Advance the clock, returning timer events in firing order.
    ///
    /// A timer whose period elapsed several times fires once per period,
    /// up to [`MAX_CATCH_UP`] times; the rest are skipped. The clock
    /// saturates at `Duration::MAX`.
    pub fn advance(&mut self, dt: Duration) -> Vec<HostEvent> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        for (&id, timer) in self.timers.iter_mut() {
            let mut fires = 0;
            while let Some(due) = timer.next_due.filter(|&due| due <= now) {
                if fires == MAX_CATCH_UP {
                    timer.next_due = timer.first_due_after(due, now);
                    tracing::trace!(timer = %id, "coalescing missed timer periods");
                    break;
                }
                fired.push((due, id));
                fires += 1;
                timer.next_due = due.checked_add(timer.period);
            }
        }
        fired.sort();
        fired
            .into_iter()
            .map(|(_, id)| HostEvent::Timer(id))
            .collect()
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of installed resize and scroll listeners.
    pub fn live_listeners(&self) -> usize {
        self.resize_listeners.len() + self.scroll_listeners.len()
    }

    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    fn next_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl InterfaceTree for HeadlessHost {
    type Element = Rect;

    fn find(&self, selector: &str) -> Option<Rect> {
        self.elements.get(selector).copied()
    }

    fn bounding_box(&self, element: &Rect) -> Rect {
        *element
    }
}

impl ViewportProvider for HeadlessHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn subscribe_resize(&mut self) -> ListenerId {
        let id = ListenerId(self.next_handle());
        self.resize_listeners.insert(id);
        id
    }

    fn unsubscribe_resize(&mut self, id: ListenerId) {
        self.resize_listeners.remove(&id);
    }
}

impl ScrollSource for HeadlessHost {
    fn subscribe_scroll(&mut self) -> ListenerId {
        let id = ListenerId(self.next_handle());
        self.scroll_listeners.insert(id);
        id
    }

    fn unsubscribe_scroll(&mut self, id: ListenerId) {
        self.scroll_listeners.remove(&id);
    }
}

impl TimerService for HeadlessHost {
    fn schedule_repeating(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_handle());
        // Zero periods would never leave the firing loop.
        let period = period.max(Duration::from_millis(1));
        self.timers.insert(
            id,
            ScheduledTimer {
                period,
                next_due: self.now.checked_add(period),
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}
