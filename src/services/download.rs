//! Fetch a document over HTTP(S) into memory.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::ExtractionError;

pub struct DocumentFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
    max_bytes: usize,
}

impl DocumentFetcher {
    pub fn new(timeout_secs: u64, max_bytes: usize) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
            max_bytes,
        })
    }

    /// Download `raw_url`, refusing bodies larger than the configured cap.
    pub async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>, ExtractionError> {
        let url = validate_url(raw_url)?;
        info!("Downloading document from: {}", url);

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.request_error(raw_url, e))?;

        if !response.status().is_success() {
            return Err(ExtractionError::DownloadFailed {
                url: raw_url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes as u64 {
                return Err(self.too_large(raw_url));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.request_error(raw_url, e))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(raw_url));
            }
            body.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn request_error(&self, raw_url: &str, e: reqwest::Error) -> ExtractionError {
        if e.is_timeout() {
            ExtractionError::DownloadTimeout {
                url: raw_url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            ExtractionError::DownloadFailed {
                url: raw_url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    fn too_large(&self, raw_url: &str) -> ExtractionError {
        warn!("Refusing download from {}: larger than {} bytes", raw_url, self.max_bytes);
        ExtractionError::DownloadFailed {
            url: raw_url.to_string(),
            reason: format!("document exceeds the {} byte limit", self.max_bytes),
        }
    }
}

/// Accept only absolute http/https URLs.
pub fn validate_url(raw_url: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw_url.trim()).map_err(|e| ExtractionError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractionError::InvalidUrl {
            url: raw_url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
