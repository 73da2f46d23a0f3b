//! Blob Storage Layer
//!
//! Everything that talks to (or signs for) Azure Blob Storage:
//! - `connection_string` - parses the account credential out of a connection string
//! - `naming` - generates collision-resistant public blob names
//! - `sas` - mints read-only Shared Access Signature URLs
//! - `azure` - writes blobs with Shared Key authorization

pub mod azure;
pub mod connection_string;
pub mod naming;
pub mod sas;

pub use azure::AzureBlobStore;
pub use connection_string::{AccountKey, StorageCredential};
pub use naming::{file_extension, generate_blob_name};
pub use sas::{sign_blob_read_url, SignedUrl, SAS_VALIDITY_DAYS};

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Url;
use thiserror::Error;

/// Content type used when the uploader did not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata key under which the optional note is stored
pub const NOTE_METADATA_KEY: &str = "note";

/// Storage errors
///
/// Messages never carry the account key or the raw connection string.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Credential(String),

    #[error("blob write failed: {0}")]
    Write(String),

    #[error("failed to sign blob URL: {0}")]
    Signing(String),

    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Location of a single blob inside the storage account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTarget {
    pub container: String,
    pub blob_name: String,
}

impl BlobTarget {
    pub fn new(container: impl Into<String>, blob_name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            blob_name: blob_name.into(),
        }
    }

    /// Absolute blob URL under the credential's blob endpoint
    pub fn url(&self, credential: &StorageCredential) -> Result<Url, StorageError> {
        let mut url = Url::parse(&credential.blob_endpoint)
            .map_err(|e| StorageError::Credential(format!("Invalid blob endpoint: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| StorageError::Credential("Blob endpoint cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(&self.container)
            .push(&self.blob_name);

        Ok(url)
    }
}

/// A blob about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlob {
    pub data: Bytes,
    pub content_type: String,
    /// Stored as `note` metadata; `None` means no metadata key at all
    pub note: Option<String>,
}

impl NewBlob {
    /// Build a blob, falling back to a generic binary type and dropping empty notes
    ///
    /// Notes are trimmed (header values lose surrounding whitespace on the
    /// wire, and the stored value must equal the signed one) and then
    /// encoded with [`encode_metadata_value`].
    pub fn new(data: impl Into<Bytes>, content_type: Option<&str>, note: Option<String>) -> Self {
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        Self {
            data: data.into(),
            content_type,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .map(|n| encode_metadata_value(&n)),
        }
    }
}

// `%` is escaped too so the stored value decodes back unambiguously
const METADATA_ESCAPE: &AsciiSet = &CONTROLS.add(b'%');

/// Make a value safe for an `x-ms-meta-*` header
///
/// Header values must be printable ASCII; anything else (control characters,
/// non-ASCII text) is percent-encoded as UTF-8.
pub fn encode_metadata_value(value: &str) -> String {
    utf8_percent_encode(value, METADATA_ESCAPE).to_string()
}

/// Blob writer seam
///
/// The upload endpoint only needs "create this blob"; tests swap in an
/// in-memory recorder.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_blob(
        &self,
        credential: &StorageCredential,
        target: &BlobTarget,
        blob: NewBlob,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(endpoint: &str) -> StorageCredential {
        StorageCredential::from_connection_string(&format!(
            "AccountName=acct;AccountKey=c2VjcmV0LWtleS1mb3ItdGVzdHM=;BlobEndpoint={}",
            endpoint
        ))
        .unwrap()
    }

    #[test]
    fn test_blob_url_appends_container_and_name() {
        let target = BlobTarget::new("uploads", "public_1_abcdef.txt");
        let url = target.url(&credential("https://acct.blob.core.windows.net")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://acct.blob.core.windows.net/uploads/public_1_abcdef.txt"
        );
    }

    #[test]
    fn test_blob_url_keeps_endpoint_path() {
        let target = BlobTarget::new("uploads", "a b.txt");
        let url = target.url(&credential("http://127.0.0.1:10000/devstoreaccount1/")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:10000/devstoreaccount1/uploads/a%20b.txt"
        );
    }

    #[test]
    fn test_new_blob_defaults() {
        let blob = NewBlob::new(Bytes::from_static(b"x"), None, Some(String::new()));
        assert_eq!(blob.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(blob.note, None);

        let blob = NewBlob::new(Bytes::from_static(b"x"), Some("image/png"), Some("hi".into()));
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.note.as_deref(), Some("hi"));
    }

    #[test]
    fn test_new_blob_trims_note() {
        let blob = NewBlob::new(Bytes::new(), None, Some(" padded note ".to_string()));
        assert_eq!(blob.note.as_deref(), Some("padded note"));

        let blob = NewBlob::new(Bytes::new(), None, Some(" \t ".to_string()));
        assert_eq!(blob.note, None);
    }

    #[test]
    fn test_metadata_value_encoding() {
        assert_eq!(encode_metadata_value("quarterly report, v2"), "quarterly report, v2");
        assert_eq!(encode_metadata_value("café"), "caf%C3%A9");
        assert_eq!(encode_metadata_value("line\nbreak"), "line%0Abreak");
        assert_eq!(encode_metadata_value("100%"), "100%25");
    }

    #[test]
    fn test_new_blob_encodes_note() {
        let blob = NewBlob::new(Bytes::new(), None, Some(" résumé ".to_string()));
        assert_eq!(blob.note.as_deref(), Some("r%C3%A9sum%C3%A9"));
    }
}
