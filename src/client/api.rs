//! Upload client
//!
//! Sends `file` + `note` as multipart to the upload endpoint and turns the
//! uniform JSON answer into either the signed URL or a displayable message.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::UploadResponse;

/// Shown when the request fails or the answer is not the expected JSON
pub const GENERIC_FAILURE: &str = "Upload failed";

/// Failed upload; `message` is meant for the user
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct UploadFailure {
    pub message: String,
}

impl UploadFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new(GENERIC_FAILURE)
    }
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file, guessing its MIME type from the extension
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("{} is not a file", path.display()))?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, content_type, bytes))
    }
}

/// Anything that can turn a file + note into a public URL
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile, note: &str) -> Result<String, UploadFailure>;
}

/// Uploader talking to the HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpUploader {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file: &SelectedFile, note: &str) -> Result<String, UploadFailure> {
        let content_type = file
            .content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(content_type.as_ref())
            .map_err(|_| UploadFailure::generic())?;
        let form = Form::new().part("file", part).text("note", note.to_string());

        info!(endpoint = %self.endpoint, file = %file.name, bytes = file.bytes.len(), "Uploading");

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Upload request failed: {}", e);
                UploadFailure::generic()
            })?;

        let body: UploadResponse = response.json().await.map_err(|e| {
            warn!("Upload response was not JSON: {}", e);
            UploadFailure::generic()
        })?;

        match body {
            UploadResponse {
                success: true,
                url: Some(url),
                ..
            } => Ok(url),
            UploadResponse { message, .. } => Err(UploadFailure::new(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
        }
    }
}
