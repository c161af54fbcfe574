#![forbid(unsafe_code)]

//! Core data model for Guidepost walkthroughs.
//!
//! This crate holds everything that is pure: viewport geometry, the
//! tutorial/step model, the read-only [`Catalog`](catalog::Catalog), the
//! shipped tutorials, and the tooltip [`place`](placement::place)ment rules.
//! It performs no I/O and keeps no mutable global state.
//!
//! # Role in Guidepost
//! `guidepost-runtime` builds the session state machine, spotlight tracking
//! and persistence on top of these types. Renderers usually only need the
//! types re-exported from the `guidepost` facade.

pub mod builtin;
pub mod catalog;
pub mod geometry;
pub mod placement;
pub mod tutorial;

pub use catalog::{Catalog, CatalogError};
pub use geometry::{Rect, Size};
pub use placement::{Offsets, PlacementConfig, PlacementStyle, place};
pub use tutorial::{Position, Step, Tutorial};
