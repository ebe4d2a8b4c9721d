//! HTTP client for the `images:annotate` endpoint.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::analysis::ImageAnalysis;
use crate::error::{VisionError, VisionResult};
use crate::wire::{AnnotateRequest, AnnotateResponse};

/// Default annotate endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Configuration for retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(max_attempts: u32, initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            multiplier,
        }
    }

    /// A single attempt, no retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1, 0, 0, 1.0)
    }

    /// Calculate delay for a given attempt number (0-indexed).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let base_delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        base_delay.min(self.max_delay_ms as f64).max(0.0) as u64
    }
}

/// Client for object localization and label detection.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct VisionClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    /// Endpoint including the `key` query parameter.
    endpoint: Url,
    retry_config: RetryConfig,
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The key lives in the query string; keep it out of logs
        let mut endpoint = self.inner.endpoint.clone();
        endpoint.set_query(None);
        f.debug_struct("VisionClient")
            .field("endpoint", &endpoint.as_str())
            .field("retry_config", &self.inner.retry_config)
            .finish_non_exhaustive()
    }
}

impl VisionClient {
    /// Create a client with default retry configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::InvalidUrl`] if `endpoint` is malformed.
    /// Returns [`VisionError::Http`] if the HTTP client fails to build.
    pub fn new(endpoint: impl AsRef<str>, api_key: &str) -> VisionResult<Self> {
        Self::with_retry_config(endpoint, api_key, RetryConfig::default())
    }

    /// Create a client with custom retry configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::InvalidUrl`] if `endpoint` is malformed.
    /// Returns [`VisionError::Http`] if the HTTP client fails to build.
    pub fn with_retry_config(
        endpoint: impl AsRef<str>,
        api_key: &str,
        retry_config: RetryConfig,
    ) -> VisionResult<Self> {
        let mut url =
            Url::parse(endpoint.as_ref()).map_err(|e| VisionError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(VisionError::InvalidUrl(format!(
                "{} is not an HTTP endpoint",
                endpoint.as_ref()
            )));
        }
        url.query_pairs_mut().append_pair("key", api_key);

        let http = Client::builder()
            .user_agent(concat!("drawpad-vision/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint: url,
                retry_config,
            }),
        })
    }

    /// Detect objects and labels in an encoded image (PNG, JPEG, ...).
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] after exhausting retries on transport
    /// failures, [`VisionError::Status`] for a non-success HTTP status,
    /// [`VisionError::Api`] if the endpoint rejected the image,
    /// [`VisionError::Json`] for an unparseable body and
    /// [`VisionError::EmptyResponse`] if no per-image result came back.
    pub async fn analyze(&self, image: &[u8]) -> VisionResult<ImageAnalysis> {
        let content = base64::engine::general_purpose::STANDARD.encode(image);
        let request = AnnotateRequest::new(&content);
        let body = serde_json::to_vec(&request)?;

        let response = self.post_with_retry(body).await?;
        let first = response
            .responses
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyResponse)?;

        if let Some(error) = first.error {
            return Err(VisionError::Api {
                code: error.code,
                message: error.message,
            });
        }

        let analysis = ImageAnalysis::from(first);
        tracing::debug!(
            "Vision found {} objects and {} labels",
            analysis.objects.len(),
            analysis.labels.len()
        );
        Ok(analysis)
    }

    /// Read an image file and [`analyze`](Self::analyze) it.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Io`] if the file cannot be read, otherwise as
    /// [`analyze`](Self::analyze).
    pub async fn analyze_file(&self, path: &Path) -> VisionResult<ImageAnalysis> {
        let bytes = tokio::fs::read(path).await?;
        self.analyze(&bytes).await
    }

    async fn post_with_retry(&self, body: Vec<u8>) -> VisionResult<AnnotateResponse> {
        let config = &self.inner.retry_config;
        let max_attempts = config.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            match self.post_once(body.clone()).await {
                Err(error) if error.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        "Vision request failed (attempt {}/{}), retrying in {}ms: {}",
                        attempt + 1,
                        max_attempts,
                        delay,
                        error
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn post_once(&self, body: Vec<u8>) -> VisionResult<AnnotateResponse> {
        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(VisionError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
