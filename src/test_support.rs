//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::core::state::{Viewer, ViewerSettings};
use crate::core::story::{MediaType, StoryItem, StoryQueue};

/// `count` five-second images with ids `story_0`, `story_1`, ...
pub fn sample_items(count: usize) -> Vec<StoryItem> {
    (0..count)
        .map(|i| {
            StoryItem::new(
                format!("story_{i}"),
                MediaType::Image,
                format!("stories/{i}.jpg"),
                Duration::from_secs(5),
            )
        })
        .collect()
}

/// A viewer on "Me"'s story at 10 Hz with default settings.
pub fn test_viewer(count: usize) -> Viewer {
    let queue = StoryQueue::new("Me", sample_items(count)).expect("non-empty sample story");
    Viewer::new(queue, ViewerSettings::default())
}
