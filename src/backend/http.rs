//! reqwest client for the AI backend
//!
//! Uses a long-lived reqwest::Client for connection pooling.
//! All endpoints are JSON over POST.

use super::{AskRequest, CategorizeRequest, FinanceBackend, SummariesRequest};
use crate::config::Config;
use crate::error::DashboardError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Reusable backend client (connection-pooled)
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DashboardError::backend("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.backend_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Backend request failed for {}: {}", path, e);
                DashboardError::backend(&format!("network error calling {}", path), e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Backend returned {} for {}: {}", status, path, error_text);
            return Err(DashboardError::BackendError(format!(
                "backend returned {} for {}",
                status, path
            )));
        }

        response.json::<R>().await.map_err(|e| {
            error!("Failed to decode backend response for {}: {}", path, e);
            DashboardError::backend(&format!("invalid response from {}", path), e)
        })
    }
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct CategorizeResponse {
    categories: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    #[serde(default)]
    summaries: Vec<String>,
}

#[async_trait]
impl FinanceBackend for HttpBackend {
    async fn ask(&self, request: &AskRequest) -> Result<String> {
        let body: AskResponse = self.post_json("/ask", request).await?;
        Ok(body.response)
    }

    async fn categorize(&self, request: &CategorizeRequest) -> Result<Vec<Value>> {
        let body: CategorizeResponse = self.post_json("/categorize", request).await?;
        Ok(body.categories)
    }

    async fn summaries(&self, request: &SummariesRequest) -> Result<Vec<String>> {
        let body: SummariesResponse = self.post_json("/summaries", request).await?;
        Ok(body.summaries)
    }
}
