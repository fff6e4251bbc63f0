//! HTTP track source.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use url::Url;

use paragliding_core::tracks::{TrackSourceTrait, TrackSummary};
use paragliding_core::Result;

use crate::errors::IgcError;
use crate::parser::parse;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads IGC files and summarizes them.
pub struct HttpTrackSource {
    client: Client,
}

impl Default for HttpTrackSource {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl HttpTrackSource {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "IGC HTTP client setup failed ({}); fetching without a {:?} timeout",
                    e, timeout
                );
                Client::new()
            });

        Self { client }
    }

    async fn download(&self, url: &str) -> std::result::Result<String, IgcError> {
        let parsed = Url::parse(url).map_err(|_| IgcError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IgcError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| IgcError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IgcError::HttpStatus(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| IgcError::Fetch(e.to_string()))
    }

    async fn summarize(&self, url: &str) -> std::result::Result<TrackSummary, IgcError> {
        let content = self.download(url).await?;
        debug!("Downloaded {} bytes from {}", content.len(), url);

        let track = parse(&content)?;
        Ok(TrackSummary {
            h_date: track.date,
            track_length: track.track_length(),
            pilot: track.pilot,
            glider: track.glider_type,
            glider_id: track.glider_id,
        })
    }
}

#[async_trait]
impl TrackSourceTrait for HttpTrackSource {
    async fn fetch(&self, url: &str) -> Result<TrackSummary> {
        self.summarize(url).await.map_err(|e| {
            warn!("Track source {} rejected: {}", url, e);
            e.into()
        })
    }
}
