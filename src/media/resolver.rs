use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::story::StoryItem;

/// Errors that can occur while resolving an item's media.
/// None of these end the session; the viewer skips or flags the item.
#[derive(Debug)]
pub enum MediaError {
    /// Local file does not exist.
    NotFound(PathBuf),
    /// Local file exists but could not be inspected.
    Io(std::io::Error),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Server answered with a non-success status.
    Status(u16),
    /// `source_ref` uses a scheme no resolver handles.
    UnsupportedScheme(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            MediaError::Io(e) => write!(f, "I/O error: {e}"),
            MediaError::Network(msg) => write!(f, "network error: {msg}"),
            MediaError::Status(status) => write!(f, "HTTP {status}"),
            MediaError::UnsupportedScheme(scheme) => write!(f, "unsupported scheme: {scheme}"),
        }
    }
}

impl std::error::Error for MediaError {}

/// Where a resolved item lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Local(PathBuf),
    Remote(String),
}

/// What the viewer learns about an item's media once it is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub source: MediaSource,
    pub content_type: Option<String>,
    pub size_bytes: Option<u64>,
}

#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Returns the name of the resolver.
    fn name(&self) -> &str;

    /// Checks that the item's media is reachable and reports what it is.
    async fn resolve(&self, item: &StoryItem) -> Result<ResolvedMedia, MediaError>;
}

/// Guess a MIME type from a path or URL extension.
pub fn guess_content_type(source_ref: &str) -> Option<&'static str> {
    let path = source_ref.split(['?', '#']).next().unwrap_or(source_ref);
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}
