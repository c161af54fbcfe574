#![forbid(unsafe_code)]

//! Tutorial and step definitions.
//!
//! A [`Tutorial`] is an ordered, non-empty sequence of [`Step`]s. Both are
//! immutable once built; the [`Catalog`](crate::catalog::Catalog) enforces
//! the non-empty invariant at registration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of the anchor the tutorial card is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Position {
    /// Card above the anchor.
    Top,
    /// Card below the anchor.
    #[default]
    Bottom,
    /// Card left of the anchor.
    Left,
    /// Card right of the anchor.
    Right,
    /// Card centered in the viewport, no spotlight.
    Center,
}

impl Position {
    /// Whether the card sits above or below its anchor.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// One screen of guidance, optionally anchored to an interface element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Selector naming the anchor element.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub target: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub position: Option<Position>,
    /// Short call to action shown on the card (e.g. "Click the button").
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub action: Option<String>,
}

impl Step {
    /// Create an unanchored step.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            target: None,
            position: None,
            action: None,
        }
    }

    /// Set the anchor selector.
    #[must_use]
    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target = Some(selector.into());
        self
    }

    /// Set the requested card position.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the call to action.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Position the card is placed at. Missing positions default to
    /// [`Position::Bottom`].
    #[inline]
    pub fn effective_position(&self) -> Position {
        self.position.unwrap_or_default()
    }

    /// The selector to spotlight, or `None` for a centered card.
    ///
    /// A step is unanchored when it has no target or asks for
    /// [`Position::Center`].
    pub fn anchor(&self) -> Option<&str> {
        match (self.target.as_deref(), self.effective_position()) {
            (Some(selector), position) if position != Position::Center => Some(selector),
            _ => None,
        }
    }
}

/// A named, ordered sequence of steps teaching one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tutorial {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

impl Tutorial {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}
