//! Resolver for media on the local filesystem.
//!
//! Accepts bare paths and `file://` URIs. Relative paths are resolved
//! against `base_dir` (the story file's directory), so a story file can
//! refer to media sitting next to it.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::core::story::StoryItem;
use crate::media::{MediaError, MediaResolver, MediaSource, ResolvedMedia, guess_content_type};

const FILE_SCHEME: &str = "file://";

pub struct LocalResolver {
    base_dir: PathBuf,
}

impl LocalResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Maps a `source_ref` to a filesystem path.
    pub fn path_for(&self, source_ref: &str) -> PathBuf {
        let raw = match source_ref.get(..FILE_SCHEME.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(FILE_SCHEME) => {
                &source_ref[FILE_SCHEME.len()..]
            }
            _ => source_ref,
        };
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[async_trait]
impl MediaResolver for LocalResolver {
    fn name(&self) -> &str {
        "local"
    }

    async fn resolve(&self, item: &StoryItem) -> Result<ResolvedMedia, MediaError> {
        let path = self.path_for(&item.source_ref);
        debug!("Resolving local media {}", path.display());

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MediaError::NotFound(path));
            }
            Err(e) => return Err(MediaError::Io(e)),
        };
        if !metadata.is_file() {
            return Err(MediaError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }

        Ok(ResolvedMedia {
            content_type: guess_content_type(&item.source_ref).map(str::to_string),
            size_bytes: Some(metadata.len()),
            source: MediaSource::Local(path),
        })
    }
}
