use async_trait::async_trait;
use reqwest::Url;
use url::ParseError;

use crate::event::AnalyticsEvent;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Sink(#[from] anyhow::Error),
}

/// Batched event transport.
///
/// Takes a slice so the wire contract stays batch shaped, even though the
/// tracker hands over one event per call.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn track(&self, events: &[AnalyticsEvent]) -> Result<(), Error>;
}

pub struct TrackUrl {
    base_url: Url,
}

impl TrackUrl {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn track_url(&self) -> Result<Url, ParseError> {
        self.base_url.join("/api/v1/track")
    }
}

/// HTTP client for the event ingestion endpoint.
pub struct IngestionClient {
    client: reqwest::Client,
    track_url: TrackUrl,
}

impl IngestionClient {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            track_url: TrackUrl::new(url),
        }
    }
}

#[async_trait]
impl EventSink for IngestionClient {
    async fn track(&self, events: &[AnalyticsEvent]) -> Result<(), Error> {
        let response = self
            .client
            .post(self.track_url.track_url()?)
            .json(events)
            .send()
            .await?;
        log::debug!("Ingestion response: {}", response.status());
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_url_joins_ingestion_path() {
        let url = TrackUrl::new(Url::parse("http://localhost:8081").unwrap());
        assert_eq!(
            url.track_url().unwrap().as_str(),
            "http://localhost:8081/api/v1/track"
        );
    }
}
