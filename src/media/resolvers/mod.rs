mod http;
mod local;

pub use http::HttpResolver;
pub use local::LocalResolver;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::story::StoryItem;
use crate::media::{MediaError, MediaResolver, ResolvedMedia};

/// Dispatches on the `source_ref` scheme: http(s) goes to [`HttpResolver`],
/// bare paths and `file://` go to [`LocalResolver`].
pub struct DefaultResolver {
    local: LocalResolver,
    http: HttpResolver,
}

impl DefaultResolver {
    pub fn new(base_dir: impl Into<PathBuf>, http_timeout: Duration) -> Self {
        Self {
            local: LocalResolver::new(base_dir),
            http: HttpResolver::new(http_timeout),
        }
    }
}

/// Scheme of a source reference, or `None` for a bare path.
fn scheme_of(source_ref: &str) -> Option<&str> {
    let (scheme, _) = source_ref.split_once("://")?;
    if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
        Some(scheme)
    } else {
        None
    }
}

#[async_trait]
impl MediaResolver for DefaultResolver {
    fn name(&self) -> &str {
        "default"
    }

    async fn resolve(&self, item: &StoryItem) -> Result<ResolvedMedia, MediaError> {
        match scheme_of(&item.source_ref).map(str::to_ascii_lowercase).as_deref() {
            None | Some("file") => self.local.resolve(item).await,
            Some("http") | Some("https") => self.http.resolve(item).await,
            Some(other) => Err(MediaError::UnsupportedScheme(other.to_string())),
        }
    }
}
