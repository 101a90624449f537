//! Resolver for remote media over HTTP(S).
//!
//! Issues a `HEAD` request and reads `content-type` / `content-length`.
//! Servers that reject `HEAD` with 405 get a ranged `GET` for the first byte
//! instead. Nothing is downloaded beyond that.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use reqwest::{Client, Response, StatusCode};

use crate::core::story::StoryItem;
use crate::media::{MediaError, MediaResolver, MediaSource, ResolvedMedia};

pub struct HttpResolver {
    client: Client,
}

impl HttpResolver {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client }
    }

    async fn probe(&self, url: &str) -> Result<Response, MediaError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        if response.status() != StatusCode::METHOD_NOT_ALLOWED {
            return Ok(response);
        }

        info!("HEAD not allowed for {}, retrying with ranged GET", url);
        self.client
            .get(url)
            .header(RANGE, "bytes=0-0")
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))
    }
}

/// Total size of the resource, from `content-range` on partial responses
/// or `content-length` otherwise.
fn size_from(response: &Response) -> Option<u64> {
    let headers = response.headers();
    if response.status() == StatusCode::PARTIAL_CONTENT {
        return headers
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit_once('/'))
            .and_then(|(_, total)| total.parse().ok());
    }
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[async_trait]
impl MediaResolver for HttpResolver {
    fn name(&self) -> &str {
        "http"
    }

    async fn resolve(&self, item: &StoryItem) -> Result<ResolvedMedia, MediaError> {
        debug!("Resolving remote media {}", item.source_ref);
        let response = self.probe(&item.source_ref).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        Ok(ResolvedMedia {
            source: MediaSource::Remote(item.source_ref.clone()),
            content_type,
            size_bytes: size_from(&response),
        })
    }
}
