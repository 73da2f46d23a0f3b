use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::client::history::default_history_path;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

/// Blob storage settings
///
/// Both values are optional at startup; the upload endpoint reports their
/// absence per request instead of refusing to boot.
#[derive(Clone, Default, Deserialize)]
pub struct StorageConfig {
    pub connection_string: Option<String>,
    pub container: Option<String>,
}

impl StorageConfig {
    pub fn is_configured(&self) -> bool {
        self.connection_string.is_some() && self.container.is_some()
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .field("container", &self.container)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub endpoint_url: String,
    pub history_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .map(|v| v.parse())
                    .unwrap_or(Ok(DEFAULT_MAX_UPLOAD_BYTES))?,
            },
            storage: StorageConfig {
                connection_string: non_empty_var("AZURE_STORAGE_CONNECTION_STRING"),
                container: non_empty_var("AZURE_BLOB_CONTAINER"),
            },
            client: ClientConfig {
                endpoint_url: env::var("PUBLIC_SHARE_URL").unwrap_or_else(|_| {
                    "http://localhost:3000/api/upload-public-file".to_string()
                }),
                history_path: non_empty_var("PUBLIC_SHARE_HISTORY")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_history_path),
            },
        })
    }

    /// Defaults without touching the environment (tests, embedding)
    pub fn local(storage: StorageConfig) -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["http://localhost:3000".to_string()],
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage,
            client: ClientConfig {
                endpoint_url: "http://localhost:3000/api/upload-public-file".to_string(),
                history_path: default_history_path(),
            },
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
