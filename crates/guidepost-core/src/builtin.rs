#![forbid(unsafe_code)]

//! Tutorials shipped with the application.
//!
//! Anchors use `data-tutorial` attribute selectors so markup changes that
//! keep the attribute do not break the walkthroughs.

use crate::catalog::{Catalog, CatalogError};
use crate::tutorial::{Position, Step, Tutorial};

pub const GETTING_STARTED: &str = "getting-started";
pub const CREATE_POST: &str = "create-post";
pub const EXPLORE_NETWORK: &str = "explore-network";

/// Build the shipped catalog.
pub fn builtin() -> Result<Catalog, CatalogError> {
    Catalog::new([getting_started(), create_post(), explore_network()])
}

fn anchor(name: &str) -> String {
    format!("[data-tutorial=\"{name}\"]")
}

fn getting_started() -> Tutorial {
    Tutorial::new(
        GETTING_STARTED,
        "Getting Started",
        "A quick look around the home feed and navigation.",
    )
    .step(
        Step::new(
            "welcome",
            "Welcome!",
            "This short tour shows you where everything lives. You can skip it at any time.",
        )
        .position(Position::Center),
    )
    .step(
        Step::new(
            "navigation",
            "Navigation",
            "Use the sidebar to move between your feed, profile, and network.",
        )
        .target(anchor("sidebar"))
        .position(Position::Right),
    )
    .step(
        Step::new(
            "feed",
            "Your Feed",
            "Posts from people you follow show up here, newest first.",
        )
        .target(anchor("feed"))
        .position(Position::Left),
    )
    .step(
        Step::new(
            "theme",
            "Light or Dark",
            "Switch themes from the header whenever you like.",
        )
        .target(anchor("theme-toggle"))
        .position(Position::Bottom)
        .action("Try toggling the theme"),
    )
    .step(
        Step::new(
            "done",
            "You're all set",
            "Find more tutorials in the help menu.",
        )
        .position(Position::Center),
    )
}

fn create_post() -> Tutorial {
    Tutorial::new(
        CREATE_POST,
        "Creating a Post",
        "Write, preview, and publish your first post.",
    )
    .step(
        Step::new(
            "compose",
            "Start Writing",
            "Click the compose box to start a new post.",
        )
        .target(anchor("composer"))
        .position(Position::Bottom)
        .action("Click the compose box"),
    )
    .step(
        Step::new(
            "attach",
            "Add Media",
            "Attach an image to make your post stand out.",
        )
        .target(anchor("attach-media"))
        .position(Position::Top),
    )
    .step(
        Step::new(
            "publish",
            "Publish",
            "When you're happy with it, publish and it appears in your followers' feeds.",
        )
        .target(anchor("publish"))
        .position(Position::Left)
        .action("Press Publish"),
    )
}

fn explore_network() -> Tutorial {
    Tutorial::new(
        EXPLORE_NETWORK,
        "Exploring Your Network",
        "See how you are connected to the people around you.",
    )
    .step(
        Step::new(
            "graph",
            "Connection Graph",
            "Each node is a person; lines show who follows whom.",
        )
        .target(anchor("network-graph"))
        .position(Position::Right),
    )
    .step(
        Step::new(
            "profile-card",
            "Profiles",
            "Select a node to open that person's profile card.",
        )
        .target(anchor("profile-card"))
        .position(Position::Left)
        .action("Select any node"),
    )
    .step(
        Step::new(
            "suggestions",
            "Suggestions",
            "People you may know are listed here, based on shared connections.",
        )
        .target(anchor("suggestions"))
        .position(Position::Top),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        for id in [GETTING_STARTED, CREATE_POST, EXPLORE_NETWORK] {
            assert!(catalog.contains(id), "missing {id}");
        }
    }

    #[test]
    fn step_ids_unique_within_tutorial() {
        let catalog = builtin().unwrap();
        for tutorial in catalog.iter() {
            let mut ids: Vec<_> = tutorial.steps.iter().map(|s| s.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), tutorial.step_count(), "{}", tutorial.id);
        }
    }

    #[test]
    fn anchors_use_data_attributes() {
        let catalog = builtin().unwrap();
        for step in catalog.iter().flat_map(|t| t.steps.iter()) {
            if let Some(selector) = step.target.as_deref() {
                assert!(selector.starts_with("[data-tutorial="), "{selector}");
            }
        }
    }
}
