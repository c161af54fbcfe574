#![forbid(unsafe_code)]

//! Guidepost runtime: session state machine, spotlight tracking, completion
//! persistence, and the [`Walkthrough`] engine that ties them to a host.
//!
//! # Role in Guidepost
//! `guidepost-core` describes tutorials and computes geometry. This crate
//! owns everything that changes over time: which step is showing, where its
//! anchor currently is, and which tutorials the user has finished.
//!
//! # How it fits in the system
//! A UI binding implements the [`host`] traits for its interface tree and
//! forwards resize, scroll, and timer callbacks as [`HostEvent`]s. The
//! renderer reads [`Walkthrough::snapshot`] each frame. The [`headless`]
//! host drives the same engine deterministically in tests.

pub mod completion;
pub mod config;
pub mod engine;
pub mod headless;
pub mod host;
pub mod session;
pub mod storage;
pub mod tracker;

pub use completion::{CompletionStore, DEFAULT_STORAGE_KEY};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, RenderSnapshot, Walkthrough};
pub use headless::HeadlessHost;
pub use host::{
    Host, HostEvent, InterfaceTree, ListenerId, ScrollSource, TimerId, TimerService,
    ViewportProvider,
};
pub use session::{SessionEvent, SessionState, StepChangeReason, TutorialSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tracker::SpotlightTracker;
