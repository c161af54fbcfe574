#![forbid(unsafe_code)]

//! Read-only registry of tutorials.
//!
//! # Invariants
//!
//! 1. Every registered tutorial has at least one step.
//! 2. Tutorial ids are unique.
//! 3. The catalog is never mutated after construction; iteration follows
//!    registration order.
//!
//! # Example
//!
//! ```
//! use guidepost_core::catalog::Catalog;
//! use guidepost_core::tutorial::{Step, Tutorial};
//!
//! let catalog = Catalog::new([Tutorial::new("intro", "Intro", "First steps")
//!     .step(Step::new("welcome", "Welcome", "Hello there"))])
//! .unwrap();
//!
//! assert_eq!(catalog.get("intro").unwrap().step_count(), 1);
//! assert!(catalog.get("missing").is_none());
//! ```

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tutorial::Tutorial;

/// Rejected catalog definition.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("tutorial `{0}` has no steps")]
    EmptyTutorial(String),
    #[error("tutorial `{0}` is registered more than once")]
    DuplicateTutorial(String),
    #[cfg(feature = "serde")]
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "serde")]
    #[error("invalid catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Serialized catalog document: `{ "tutorials": [...] }` or
/// `[[tutorials]]` tables.
#[cfg(feature = "serde")]
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    tutorials: Vec<Tutorial>,
}

/// Mapping from tutorial id to tutorial, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tutorials: Vec<Tutorial>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating every tutorial.
    pub fn new(tutorials: impl IntoIterator<Item = Tutorial>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for tutorial in tutorials {
            if tutorial.steps.is_empty() {
                return Err(CatalogError::EmptyTutorial(tutorial.id));
            }
            if catalog.index.contains_key(&tutorial.id) {
                return Err(CatalogError::DuplicateTutorial(tutorial.id));
            }
            catalog
                .index
                .insert(tutorial.id.clone(), catalog.tutorials.len());
            catalog.tutorials.push(tutorial);
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(s)?;
        Self::new(doc.tutorials)
    }

    /// Load a catalog from a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(s)?;
        Self::new(doc.tutorials)
    }

    /// Look up a tutorial by id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&Tutorial> {
        self.index.get(id).map(|&i| &self.tutorials[i])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tutorials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tutorials.is_empty()
    }

    /// Tutorials in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tutorial> + '_ {
        self.tutorials.iter()
    }

    /// Tutorial ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.tutorials.iter().map(|t| t.id.as_str())
    }
}
