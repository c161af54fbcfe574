#![forbid(unsafe_code)]

//! Host traits: the boundary between the walkthrough engine and the
//! embedding environment.
//!
//! The engine never touches the interface tree, the event loop, or timers
//! directly. A browser binding implements these traits over the DOM; tests
//! use [`HeadlessHost`](crate::headless::HeadlessHost).
//!
//! Subscriptions are identified by opaque handles. The host reports every
//! fired listener or timer back through
//! [`Walkthrough::handle_host_event`](crate::engine::Walkthrough::handle_host_event)
//! as a [`HostEvent`] carrying the handle it was installed under; events
//! whose handle is no longer live are dropped by the engine.

use core::time::Duration;

use guidepost_core::geometry::{Rect, Size};

/// Handle for a resize or scroll listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl core::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "listener:{}", self.0)
    }
}

/// Handle for a repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// A callback the host delivers to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The viewport was resized.
    Resize(ListenerId),
    /// The visible area was scrolled.
    Scroll(ListenerId),
    /// A repeating timer fired.
    Timer(TimerId),
}

/// Query access to the interface tree.
pub trait InterfaceTree {
    /// Host-specific element handle.
    type Element;

    /// Locate the element matching `selector`.
    fn find(&self, selector: &str) -> Option<Self::Element>;

    /// Bounding box of `element` in viewport coordinates.
    fn bounding_box(&self, element: &Self::Element) -> Rect;
}

/// Viewport size and resize notifications.
pub trait ViewportProvider {
    fn viewport(&self) -> Size;

    /// Start delivering [`HostEvent::Resize`] under a fresh handle.
    fn subscribe_resize(&mut self) -> ListenerId;

    /// Stop delivering resize events for `id`. Unknown ids are ignored.
    fn unsubscribe_resize(&mut self, id: ListenerId);
}

/// Scroll notifications within the active view.
pub trait ScrollSource {
    /// Start delivering [`HostEvent::Scroll`] under a fresh handle.
    fn subscribe_scroll(&mut self) -> ListenerId;

    /// Stop delivering scroll events for `id`. Unknown ids are ignored.
    fn unsubscribe_scroll(&mut self, id: ListenerId);
}

/// Repeating timers.
pub trait TimerService {
    /// Fire [`HostEvent::Timer`] every `period` until cancelled.
    fn schedule_repeating(&mut self, period: Duration) -> TimerId;

    /// Cancel a timer. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Everything the spotlight tracker needs from its environment.
pub trait Host: InterfaceTree + ViewportProvider + ScrollSource + TimerService {}

impl<T> Host for T where T: InterfaceTree + ViewportProvider + ScrollSource + TimerService {}
