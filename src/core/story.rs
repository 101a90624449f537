//! # Story Queue
//!
//! The ordered list of media items for one viewing session.
//!
//! ```text
//! StoryQueue
//! ├── subject: String         // whose story ("Me", a contact name)
//! ├── items: Vec<StoryItem>   // never empty, fixed once built
//! └── current: usize          // 0 <= current < items.len()
//! ```
//!
//! Only the navigation controller moves `current` (see `state.rs`).
//! Everything else gets read access.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Kind of media an item holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// One unit of ephemeral media.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryItem {
    pub id: String,
    pub media_type: MediaType,
    /// Local path, `file://` URI, or http(s) URL. Opaque to the engine.
    pub source_ref: String,
    pub duration: Duration,
}

/// Converts seconds to an item duration. `None` unless the value is
/// positive, finite and fits in a `Duration`.
pub fn duration_from_secs(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

impl StoryItem {
    pub fn new(
        id: impl Into<String>,
        media_type: MediaType,
        source_ref: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            media_type,
            source_ref: source_ref.into(),
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    /// A session was started with no items.
    EmptySession,
    /// An index outside `0..len` was requested. Indicates a caller bug.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for StoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryError::EmptySession => write!(f, "story session has no items"),
            StoryError::IndexOutOfRange { index, len } => {
                write!(f, "story index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for StoryError {}

#[derive(Debug, Clone)]
pub struct StoryQueue {
    subject: String,
    items: Vec<StoryItem>,
    current: usize,
}

impl StoryQueue {
    /// Builds a queue positioned at the first item.
    pub fn new(subject: impl Into<String>, items: Vec<StoryItem>) -> Result<Self, StoryError> {
        if items.is_empty() {
            return Err(StoryError::EmptySession);
        }
        Ok(Self {
            subject: subject.into(),
            items,
            current: 0,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed queue; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn item_at(&self, index: usize) -> Result<&StoryItem, StoryError> {
        self.items.get(index).ok_or(StoryError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn current_item(&self) -> &StoryItem {
        // `current` is kept in bounds by step_forward/step_back
        &self.items[self.current]
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.items.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Moves to the next item. Returns false (and stays put) at the end.
    pub(crate) fn step_forward(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous item. Returns false (and stays put) at the start.
    pub(crate) fn step_back(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}
