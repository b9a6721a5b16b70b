use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{PersistenceError, PersistenceGateway};
use crate::models::record::MediaRecord;

const DATA_PATH: &str = "/api/data";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Gateway backed by a remote `GET/POST /api/data` snapshot endpoint.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns [`PersistenceError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PersistenceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("oniscenary/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn data_url(&self) -> String {
        format!("{}{DATA_PATH}", self.base_url)
    }

    async fn check(response: Response) -> Result<Response, PersistenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(text);

        Err(PersistenceError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for HttpGateway {
    fn store_key(&self) -> &str {
        &self.base_url
    }

    async fn load(&self) -> Result<Vec<MediaRecord>, PersistenceError> {
        let response = self.client.get(self.data_url()).send().await?;
        let response = Self::check(response).await?;

        let text = response.text().await?;
        let records: Vec<MediaRecord> =
            serde_json::from_str(&text).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        debug!(count = records.len(), "Fetched snapshot from {}", self.base_url);
        Ok(records)
    }

    async fn save(&self, records: &[MediaRecord]) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(self.data_url())
            .json(records)
            .send()
            .await?;
        Self::check(response).await?;

        debug!(count = records.len(), "Pushed snapshot to {}", self.base_url);
        Ok(())
    }
}
