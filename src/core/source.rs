//! # Story Source
//!
//! Builds a [`StoryQueue`] from a story file. The format is the payload a
//! story entry point hands to the viewer:
//!
//! ```json
//! {
//!   "name": "Me",
//!   "mediaItems": [
//!     { "uri": "stories/1.jpg", "type": "image" },
//!     { "uri": "https://cdn.example.com/clip.mp4", "type": "video", "duration": 12.5 }
//!   ]
//! }
//! ```
//!
//! `id` is optional per item (defaults to `user_story_<index>`), `type` defaults
//! to `image`, and `duration` defaults to the configured image duration.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::story::{MediaType, StoryError, StoryItem, StoryQueue, duration_from_secs};

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryFile {
    pub name: Option<String>,
    #[serde(default)]
    pub media_items: Vec<MediaEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MediaEntry {
    pub id: Option<String>,
    pub uri: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    /// Seconds.
    pub duration: Option<f64>,
}

#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Story(StoryError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "story file I/O error: {e}"),
            SourceError::Parse(e) => write!(f, "story file parse error: {e}"),
            SourceError::Story(e) => write!(f, "invalid story: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<StoryError> for SourceError {
    fn from(e: StoryError) -> Self {
        SourceError::Story(e)
    }
}

/// Turns a parsed story file into a queue.
///
/// `fallback_subject` names the story when the file has no `name`.
pub fn build_queue(
    file: StoryFile,
    fallback_subject: &str,
    image_duration: Duration,
) -> Result<StoryQueue, SourceError> {
    let subject = file
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| fallback_subject.to_string());

    let items = file
        .media_items
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let duration = match entry.duration {
                Some(secs) => duration_from_secs(secs).unwrap_or_else(|| {
                    warn!("Item {} has invalid duration {}, using default", index, secs);
                    image_duration
                }),
                None => image_duration,
            };
            StoryItem {
                id: entry.id.unwrap_or_else(|| format!("user_story_{index}")),
                media_type: entry.media_type,
                source_ref: entry.uri,
                duration,
            }
        })
        .collect();

    StoryQueue::new(subject, items).map_err(SourceError::from)
}

pub fn parse_story(
    json: &str,
    fallback_subject: &str,
    image_duration: Duration,
) -> Result<StoryQueue, SourceError> {
    let file: StoryFile = serde_json::from_str(json).map_err(SourceError::Parse)?;
    build_queue(file, fallback_subject, image_duration)
}

/// Reads and parses a story file. The file stem is the fallback subject.
pub fn load_story(path: &Path, image_duration: Duration) -> Result<StoryQueue, SourceError> {
    let contents = fs::read_to_string(path).map_err(SourceError::Io)?;
    let fallback = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Story");
    let queue = parse_story(&contents, fallback, image_duration)?;
    info!(
        "Loaded story '{}' with {} items from {}",
        queue.subject(),
        queue.len(),
        path.display()
    );
    Ok(queue)
}
