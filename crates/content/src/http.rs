use std::time::Duration;

use async_trait::async_trait;

use crate::configuration::Config;
use crate::source::{ContentError, ContentResult, ContentSource, MissionGraph, MissionRequest};

/// Generator backed by the LLM content server.
pub struct HttpContentSource {
    client: reqwest::Client,
    url: String,
}

impl HttpContentSource {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            url: format!("{}/api/missions", config.content_api_url),
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn generate(&self, request: &MissionRequest) -> ContentResult<MissionGraph> {
        log::debug!(
            "Content > Generate > Requesting mission for destination {}",
            request.destination
        );
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|error| ContentError::RequestFailed(error.to_string()))?;

        if !response.status().is_success() {
            return Err(ContentError::BadStatus(response.status().as_u16()));
        }

        response
            .json::<MissionGraph>()
            .await
            .map_err(|error| ContentError::DecodeFailed(error.to_string()))
    }
}
