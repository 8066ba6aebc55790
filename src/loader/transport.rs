//! HTTP transport for the dashboard backend.
//!
//! The loader only needs "GET this path, give me JSON". That exchange is
//! the `Transport` port; `HttpTransport` is the reqwest adapter.

use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Fetches a JSON document for a backend path such as `/get_available_years`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    /// `None` keeps reqwest's default (no timeout).
    pub timeout_seconds: Option<u64>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: None,
        }
    }
}

/// reqwest-backed transport.
pub struct HttpTransport {
    config: TransportConfig,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| DashboardError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                DashboardError::Network(format!(
                    "Request to {} timed out after {}s",
                    path,
                    self.config.timeout_seconds.unwrap_or_default()
                ))
            } else if e.is_connect() {
                DashboardError::Network(format!(
                    "Cannot connect to backend at {}",
                    self.config.base_url
                ))
            } else {
                DashboardError::Network(format!("Failed to send request: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(DashboardError::Network(format!(
                "Backend returned {} for {}",
                response.status(),
                path
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::Parse(format!("Invalid JSON from {}: {}", path, e)))
    }
}
