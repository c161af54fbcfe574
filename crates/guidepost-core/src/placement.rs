#![forbid(unsafe_code)]

//! Tooltip card placement around a spotlight rectangle.
//!
//! # Invariants
//!
//! 1. No spotlight or a [`Position::Center`] request always yields
//!    [`PlacementStyle::Centered`].
//! 2. The card sits exactly `gap` away from the anchor-facing edge of the
//!    spotlight.
//! 3. The cross axis is centered on the spotlight and clamped only against
//!    the left (vertical sides) or top (horizontal sides) margin.
//!
//! The card footprint is an assumed constant, not a measurement of the
//! rendered card, and the far edge is never clamped: a wide card next to
//! an anchor near the right or bottom edge can overflow the viewport.
//!
//! # Example
//!
//! ```
//! use guidepost_core::geometry::{Rect, Size};
//! use guidepost_core::placement::{PlacementConfig, PlacementStyle, place};
//! use guidepost_core::tutorial::Position;
//!
//! let spot = Rect::new(100.0, 100.0, 50.0, 20.0);
//! let style = place(Some(spot), Position::Bottom, Size::new(1280.0, 800.0), &PlacementConfig::default());
//! let PlacementStyle::Anchored(offsets) = style else { panic!() };
//! assert_eq!(offsets.top, Some(136.0));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};
use crate::tutorial::Position;

/// Assumed card width.
pub const DEFAULT_CARD_WIDTH: f64 = 380.0;
/// Assumed card height.
pub const DEFAULT_CARD_HEIGHT: f64 = 200.0;
/// Distance between the spotlight and the card.
pub const DEFAULT_GAP: f64 = 16.0;
/// Minimum distance between the card and the viewport's left/top edge.
pub const DEFAULT_MARGIN: f64 = 16.0;

/// Placement constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
    pub margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            gap: DEFAULT_GAP,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Offsets from the viewport edges, CSS `position: fixed` style.
///
/// `bottom` and `right` are distances from the bottom and right viewport
/// edges respectively.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offsets {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub top: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bottom: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right: Option<f64>,
}

/// Where the renderer draws the tutorial card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlacementStyle {
    /// Center the card in the viewport.
    Centered,
    /// Pin the card with the given offsets.
    Anchored(Offsets),
}

impl PlacementStyle {
    #[inline]
    pub fn is_centered(&self) -> bool {
        matches!(self, Self::Centered)
    }

    /// The card rectangle this style produces for the configured footprint.
    ///
    /// Useful for hit testing. The result may extend past the viewport.
    #[must_use]
    pub fn card_rect(&self, viewport: Size, config: &PlacementConfig) -> Rect {
        let (w, h) = (config.card_width, config.card_height);
        match self {
            Self::Centered => Rect::new(
                (viewport.width - w) / 2.0,
                (viewport.height - h) / 2.0,
                w,
                h,
            ),
            Self::Anchored(o) => {
                let x = match (o.left, o.right) {
                    (Some(left), _) => left,
                    (None, Some(right)) => viewport.width - right - w,
                    (None, None) => (viewport.width - w) / 2.0,
                };
                let y = match (o.top, o.bottom) {
                    (Some(top), _) => top,
                    (None, Some(bottom)) => viewport.height - bottom - h,
                    (None, None) => (viewport.height - h) / 2.0,
                };
                Rect::new(x, y, w, h)
            }
        }
    }
}

/// Compute the card placement for a spotlight and a requested side.
#[must_use]
pub fn place(
    spotlight: Option<Rect>,
    position: Position,
    viewport: Size,
    config: &PlacementConfig,
) -> PlacementStyle {
    let Some(rect) = spotlight else {
        return PlacementStyle::Centered;
    };

    let gap = config.gap;
    let centered_left = (rect.center_x() - config.card_width / 2.0).max(config.margin);
    let centered_top = (rect.center_y() - config.card_height / 2.0).max(config.margin);

    let offsets = match position {
        Position::Center => return PlacementStyle::Centered,
        Position::Top => Offsets {
            bottom: Some(viewport.height - rect.top() + gap),
            left: Some(centered_left),
            ..Offsets::default()
        },
        Position::Bottom => Offsets {
            top: Some(rect.bottom() + gap),
            left: Some(centered_left),
            ..Offsets::default()
        },
        Position::Left => Offsets {
            top: Some(centered_top),
            right: Some(viewport.width - rect.left() + gap),
            ..Offsets::default()
        },
        Position::Right => Offsets {
            top: Some(centered_top),
            left: Some(rect.right() + gap),
            ..Offsets::default()
        },
    };
    PlacementStyle::Anchored(offsets)
}
