use std::sync::Arc;

use crate::config::Config;
use crate::storage::{AzureBlobStore, BlobStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub blob_store: Arc<dyn BlobStore>,
}

impl AppState {
    /// State backed by the real Azure Blob REST API
    pub fn new(config: Config) -> Self {
        Self::with_blob_store(config, Arc::new(AzureBlobStore::new()))
    }

    pub fn with_blob_store(config: Config, blob_store: Arc<dyn BlobStore>) -> Self {
        Self { config, blob_store }
    }
}

/// Uniform JSON body of the upload endpoint
///
/// `{success: true, url}` or `{success: false, message}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            success: true,
            url: Some(url.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub storage_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(UploadResponse::success("https://x/y?sig=1")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "url": "https://x/y?sig=1"}));
    }

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(UploadResponse::failure("No file uploaded")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "No file uploaded"})
        );
    }
}
