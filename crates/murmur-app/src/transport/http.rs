//! Multipart HTTP uploader
//!
//! Posts the file as a `file` form part to the configured endpoint and expects
//! a JSON body `{ "url": "..." }` back.

use super::upload::{FileUploader, UploadError, UploadedFile};
use crate::config::UploadConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// [`FileUploader`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: u32,
}

impl HttpUploader {
    /// Uploader for the configured endpoint
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// Endpoint uploads are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FileUploader for HttpUploader {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedFile, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .timeout(Duration::from_millis(u64::from(self.timeout_ms)))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UploadError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    UploadError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(UploadError::Rejected {
                status: response.status().as_u16(),
            });
        }

        let body: UploadResponse = response.json().await.map_err(|e| UploadError::Network {
            message: e.to_string(),
        })?;
        let url = body
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or(UploadError::MissingUrl)?;

        tracing::debug!(file_name, size, url = %url, "file uploaded");
        Ok(UploadedFile { url })
    }
}
