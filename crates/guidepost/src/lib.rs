#![forbid(unsafe_code)]

//! Guidepost public facade crate.
//!
//! Re-exports the tutorial model and placement from `guidepost-core`, the
//! engine and host interfaces from `guidepost-runtime`, and offers a
//! prelude plus a single [`Error`] type for applications.
//!
//! # Example
//!
//! ```
//! use guidepost::prelude::*;
//!
//! let mut host = HeadlessHost::new(Size::new(1280.0, 800.0));
//! host.insert_element("[data-tutorial=\"composer\"]", Rect::new(40.0, 20.0, 600.0, 80.0));
//!
//! let mut engine = Walkthrough::builtin(MemoryStore::new(), host)?;
//! engine.start(CREATE_POST);
//! let frame = engine.snapshot().expect("tutorial is running");
//! assert!(frame.spotlight.is_some());
//! # Ok::<(), guidepost::Error>(())
//! ```

use std::path::Path;

// --- Core re-exports -------------------------------------------------------

pub use guidepost_core::builtin::{CREATE_POST, EXPLORE_NETWORK, GETTING_STARTED, builtin};
pub use guidepost_core::{
    Catalog, CatalogError, Offsets, PlacementConfig, PlacementStyle, Position, Rect, Size, Step,
    Tutorial, place,
};

// --- Runtime re-exports ----------------------------------------------------

pub use guidepost_runtime::{
    CompletionStore, ConfigError, EngineConfig, EngineError, FileStore, HeadlessHost, Host,
    HostEvent, InterfaceTree, KeyValueStore, ListenerId, MemoryStore, RenderSnapshot,
    ScrollSource, SessionEvent, SessionState, SpotlightTracker, StepChangeReason, StorageError,
    TimerId, TimerService, TutorialSession, ViewportProvider, Walkthrough,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Guidepost applications.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Standard result type for Guidepost APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build an engine whose completion record lives in a JSON file.
///
/// The file is created on the first completion. A corrupt state file is
/// moved aside and the engine starts with nothing completed; only an
/// invalid `config` or an unreadable path is an error.
pub fn open<H: Host>(
    catalog: Catalog,
    config: EngineConfig,
    state_path: impl AsRef<Path>,
    host: H,
) -> Result<Walkthrough<H, FileStore>> {
    let store = FileStore::open(state_path)?;
    Ok(Walkthrough::with_config(catalog, store, host, config)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CREATE_POST, Catalog, EXPLORE_NETWORK, EngineConfig, Error, GETTING_STARTED, HeadlessHost,
        Host, HostEvent, MemoryStore, PlacementStyle, Position, Rect, RenderSnapshot, Result,
        SessionEvent, Size, Step, Tutorial, Walkthrough,
    };

    pub use crate::{core, runtime};
}

pub use guidepost_core as core;
pub use guidepost_runtime as runtime;
