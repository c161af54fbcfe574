#![forbid(unsafe_code)]

//! End-to-end walkthrough lifecycle against the headless host.
//!
//! Covers listener/timer hygiene across step changes, stale callbacks,
//! missing anchors, re-measurement on resize/scroll/poll, and durable
//! completion through a file store.
//!
//! Run:
//!   cargo test -p guidepost-runtime --test walkthrough_lifecycle

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use guidepost_core::catalog::Catalog;
use guidepost_core::geometry::{Rect, Size};
use guidepost_core::placement::{Offsets, PlacementStyle};
use guidepost_core::tutorial::{Position, Step, Tutorial};
use guidepost_runtime::{
    FileStore, HeadlessHost, HostEvent, InterfaceTree, KeyValueStore, ListenerId, MemoryStore,
    ScrollSource, SessionEvent, SessionState, TimerId, TimerService, ViewportProvider, Walkthrough,
};
use pretty_assertions::assert_eq;

// ── Helpers ─────────────────────────────────────────────────────────────

const VIEWPORT: Size = Size::new(1280.0, 800.0);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn catalog() -> Catalog {
    Catalog::new([
        Tutorial::new("tour", "Tour", "three steps")
            .step(Step::new("intro", "Welcome", "hello").position(Position::Center))
            .step(
                Step::new("button", "Button", "press it")
                    .target("#button")
                    .position(Position::Bottom),
            )
            .step(
                Step::new("panel", "Panel", "look here")
                    .target("#panel")
                    .position(Position::Left),
            ),
        Tutorial::new("ghost", "Ghost", "anchor never renders").step(
            Step::new("boo", "Boo", "nothing there")
                .target("#missing")
                .position(Position::Right),
        ),
    ])
    .unwrap()
}

fn host() -> HeadlessHost {
    let mut host = HeadlessHost::new(VIEWPORT);
    host.insert_element("#button", Rect::new(108.0, 108.0, 34.0, 4.0));
    host.insert_element("#panel", Rect::new(900.0, 300.0, 200.0, 100.0));
    host
}

fn engine() -> Walkthrough<HeadlessHost, MemoryStore> {
    Walkthrough::new(catalog(), MemoryStore::new(), host())
}

fn assert_no_handles(engine: &Walkthrough<HeadlessHost, MemoryStore>) {
    assert_eq!(engine.host().live_listeners(), 0, "leaked listeners");
    assert_eq!(engine.host().live_timers(), 0, "leaked timers");
}

/// Host whose state outlives the engine, so teardown on drop is visible.
#[derive(Clone)]
struct SharedHost(Rc<RefCell<HeadlessHost>>);

impl Default for SharedHost {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(host())))
    }
}

impl InterfaceTree for SharedHost {
    type Element = Rect;

    fn find(&self, selector: &str) -> Option<Rect> {
        self.0.borrow().find(selector)
    }

    fn bounding_box(&self, element: &Rect) -> Rect {
        *element
    }
}

impl ViewportProvider for SharedHost {
    fn viewport(&self) -> Size {
        self.0.borrow().viewport()
    }

    fn subscribe_resize(&mut self) -> ListenerId {
        self.0.borrow_mut().subscribe_resize()
    }

    fn unsubscribe_resize(&mut self, id: ListenerId) {
        self.0.borrow_mut().unsubscribe_resize(id);
    }
}

impl ScrollSource for SharedHost {
    fn subscribe_scroll(&mut self) -> ListenerId {
        self.0.borrow_mut().subscribe_scroll()
    }

    fn unsubscribe_scroll(&mut self, id: ListenerId) {
        self.0.borrow_mut().unsubscribe_scroll(id);
    }
}

impl TimerService for SharedHost {
    fn schedule_repeating(&mut self, period: Duration) -> TimerId {
        self.0.borrow_mut().schedule_repeating(period)
    }

    fn cancel(&mut self, id: TimerId) {
        self.0.borrow_mut().cancel(id);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Handle hygiene
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn centered_step_installs_no_handles() {
    let mut engine = engine();
    engine.start("tour");
    assert_no_handles(&engine);
    assert_eq!(engine.spotlight(), None);
}

#[test]
fn one_activation_per_anchored_step() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    assert_eq!(engine.host().live_listeners(), 2);
    assert_eq!(engine.host().live_timers(), 1);

    engine.next();
    assert_eq!(engine.host().live_listeners(), 2);
    assert_eq!(engine.host().live_timers(), 1);

    engine.prev();
    engine.prev();
    assert_no_handles(&engine);
}

#[test]
fn finishing_releases_everything() {
    let mut engine = engine();
    engine.start("tour");
    engine.jump_to(2);
    let event = engine.next();
    assert!(matches!(event, Some(SessionEvent::Finished { .. })));
    assert_eq!(engine.state(), &SessionState::Idle);
    assert_no_handles(&engine);
    assert!(engine.placement().is_centered());
}

#[test]
fn skipping_releases_everything() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    engine.skip();
    assert_no_handles(&engine);
    assert!(!engine.is_complete("tour"));
}

#[test]
fn replacing_a_tutorial_releases_its_handles() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    let event = engine.start("ghost");
    assert_eq!(
        event,
        Some(SessionEvent::Started {
            tutorial_id: "ghost".into(),
            replaced: Some("tour".into()),
        })
    );
    assert_eq!(engine.host().live_listeners(), 2);
    assert_eq!(engine.host().live_timers(), 1);
    assert!(!engine.is_complete("tour"));
}

#[test]
fn dropping_the_engine_releases_everything() {
    let shared = SharedHost::default();
    let mut engine = Walkthrough::new(catalog(), MemoryStore::new(), shared.clone());
    engine.start("tour");
    engine.next();
    assert_eq!(shared.0.borrow().live_timers(), 1);

    drop(engine);
    assert_eq!(shared.0.borrow().live_listeners(), 0);
    assert_eq!(shared.0.borrow().live_timers(), 0);
}

#[test]
fn unknown_start_keeps_current_activation() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    let before = engine.spotlight();
    assert_eq!(engine.start("does-not-exist"), None);
    assert_eq!(engine.spotlight(), before);
    assert_eq!(engine.host().live_timers(), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// Stale callbacks
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn stale_timer_after_step_change_is_ignored() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();

    // Collect the button step's timer events, then move on before
    // delivering them.
    let stale = engine.host_mut().advance(ms(100));
    assert_eq!(stale.len(), 1);
    engine.next();
    let panel = engine.spotlight();
    let measured_before = engine.tracker().measurements();

    assert_eq!(engine.dispatch(stale), 0);
    assert_eq!(engine.spotlight(), panel);
    assert_eq!(engine.tracker().measurements(), measured_before);
}

#[test]
fn stale_events_after_skip_are_ignored() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    let mut stale = engine.host_mut().set_viewport(Size::new(1024.0, 768.0));
    stale.extend(engine.host_mut().scroll_by(0.0, 10.0));
    engine.skip();
    assert_eq!(engine.dispatch(stale), 0);
    assert_eq!(engine.spotlight(), None);
}

#[test]
fn forged_handles_are_ignored() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    assert!(!engine.handle_host_event(HostEvent::Timer(TimerId(9_999))));
    assert!(!engine.handle_host_event(HostEvent::Resize(ListenerId(9_999))));
}

// ═════════════════════════════════════════════════════════════════════════
// Measurement and placement
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn bottom_step_places_card_below_spotlight() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    assert_eq!(engine.spotlight(), Some(Rect::new(100.0, 100.0, 50.0, 20.0)));
    assert_eq!(
        engine.placement(),
        PlacementStyle::Anchored(Offsets {
            top: Some(136.0),
            left: Some(16.0),
            ..Offsets::default()
        })
    );
}

#[test]
fn left_step_places_card_before_spotlight() {
    let mut engine = engine();
    engine.start("tour");
    engine.jump_to(2);
    // Panel padded: {892, 292, 216, 116}; center y = 350.
    assert_eq!(
        engine.placement(),
        PlacementStyle::Anchored(Offsets {
            right: Some(1280.0 - 892.0 + 16.0),
            top: Some(350.0 - 100.0),
            ..Offsets::default()
        })
    );
}

#[test]
fn missing_anchor_centers_even_when_right_requested() {
    let mut engine = engine();
    engine.start("ghost");
    assert_eq!(engine.spotlight(), None);
    assert!(engine.placement().is_centered());
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.step.id, "boo");
    assert_eq!(snap.spotlight, None);
    assert_eq!(snap.placement, PlacementStyle::Centered);
}

#[test]
fn resize_remeasures_and_replaces() {
    let mut engine = engine();
    engine.start("tour");
    engine.jump_to(2);
    let events = engine.host_mut().set_viewport(Size::new(1600.0, 900.0));
    assert_eq!(engine.dispatch(events), 1);
    let PlacementStyle::Anchored(offsets) = engine.placement() else {
        panic!("expected anchored placement");
    };
    assert_eq!(offsets.right, Some(1600.0 - 892.0 + 16.0));
}

#[test]
fn scroll_moves_the_spotlight() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    let events = engine.host_mut().scroll_by(0.0, 50.0);
    assert_eq!(engine.dispatch(events), 1);
    assert_eq!(engine.spotlight(), Some(Rect::new(100.0, 50.0, 50.0, 20.0)));
    assert_eq!(
        engine.placement(),
        PlacementStyle::Anchored(Offsets {
            top: Some(86.0),
            left: Some(16.0),
            ..Offsets::default()
        })
    );
}

#[test]
fn poll_heals_a_late_anchor_within_one_interval() {
    let mut engine = engine();
    engine.start("ghost");
    assert_eq!(engine.spotlight(), None);

    engine
        .host_mut()
        .insert_element("#missing", Rect::new(200.0, 200.0, 40.0, 40.0));
    let interval = engine.config().poll_interval();
    let events = engine.host_mut().advance(interval);
    assert_eq!(engine.dispatch(events), 1);
    assert_eq!(engine.spotlight(), Some(Rect::new(192.0, 192.0, 56.0, 56.0)));
    assert!(!engine.placement().is_centered());
}

#[test]
fn poll_notices_a_vanished_anchor() {
    let mut engine = engine();
    engine.start("tour");
    engine.next();
    assert!(engine.spotlight().is_some());

    engine.host_mut().remove_element("#button");
    let events = engine.host_mut().advance(ms(100));
    engine.dispatch(events);
    assert_eq!(engine.spotlight(), None);
    assert!(engine.placement().is_centered());
}

// ═════════════════════════════════════════════════════════════════════════
// Completion persistence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn completion_survives_restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guidepost.json");

    {
        let store = FileStore::open(&path).unwrap();
        let mut engine = Walkthrough::new(catalog(), store, host());
        engine.start("ghost");
        engine.next();
        assert!(engine.is_complete("ghost"));
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
        store.get("completedTutorials").unwrap().as_deref(),
        Some(r#"["ghost"]"#)
    );
    let engine = Walkthrough::new(catalog(), store, host());
    assert!(engine.is_complete("ghost"));
    assert!(!engine.is_complete("tour"));
}

#[test]
fn completion_order_is_preserved() {
    let mut engine = engine();
    engine.start("tour");
    engine.end();
    engine.start("ghost");
    engine.end();
    assert_eq!(
        engine.completion().completed().collect::<Vec<_>>(),
        ["tour", "ghost"]
    );
    assert_eq!(
        engine.completion().store().peek("completedTutorials"),
        Some(r#"["tour","ghost"]"#)
    );
}
