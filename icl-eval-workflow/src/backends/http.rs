use icl_eval_core::{CoreError, Result};
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

/// Thin JSON-over-HTTP client shared by the backends.
///
/// No retries: a failed call surfaces as `CoreError::Backend` and fails the
/// run that issued it.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl JsonClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CoreError::Validation(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| CoreError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base carries.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Backend(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Backend(format!("Failed to read response from {}: {}", url, e)))?;

        if !status.is_success() {
            return Err(error_for_status(status, &url, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            CoreError::Backend(format!("Unexpected response from {}: {}", url, e))
        })
    }
}

fn error_for_status(status: StatusCode, url: &str, body: &str) -> CoreError {
    match status {
        StatusCode::NOT_FOUND => CoreError::NotFound(format!("{} ({})", url, body.trim())),
        _ => CoreError::Backend(format!("{} returned {}: {}", url, status, body.trim())),
    }
}
