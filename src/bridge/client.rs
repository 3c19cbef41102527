//! HTTP client for the query service.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::NotebookApi;
use crate::config::ClientConfig;
use crate::db::Row;
use crate::error::{NotebookError, Result};
use crate::server::models::{ErrorResponse, QueryRequest};

/// Talks to a running service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotebookError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Creates a client from the `[client]` config section.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the `{error}` body of a failed response, falling back to the status.
    async fn error_message(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Service returned {status}"),
        };
        (status, message)
    }
}

#[async_trait]
impl NotebookApi for HttpApi {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/tables"))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let (_, message) = Self::error_message(response).await;
            return Err(NotebookError::catalog(message));
        }

        response.json().await.map_err(transport_error)
    }

    async fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql, "Sending query");
        let response = self
            .client
            .post(self.url("/query"))
            .json(&QueryRequest::new(sql))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let (status, message) = Self::error_message(response).await;
            return Err(if status == StatusCode::BAD_REQUEST {
                NotebookError::invalid_request(message)
            } else {
                NotebookError::execution(message)
            });
        }

        response.json().await.map_err(transport_error)
    }
}

fn transport_error(e: reqwest::Error) -> NotebookError {
    NotebookError::transport(e.to_string())
}
