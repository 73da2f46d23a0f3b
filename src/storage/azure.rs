//! Azure Blob Storage writer
//!
//! Creates block blobs with a single Put Blob request authorized with the
//! account's Shared Key. The whole payload goes in one request, so the blob
//! either appears complete or not at all.

use super::sas::{hmac_sha256_base64, STORAGE_SERVICE_VERSION};
use super::{BlobStore, BlobTarget, NewBlob, StorageCredential, StorageError, NOTE_METADATA_KEY};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use tracing::{debug, error};

/// Blob writer backed by the Azure Blob REST API
#[derive(Debug, Clone, Default)]
pub struct AzureBlobStore {
    http: reqwest::Client,
}

impl AzureBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn put_blob(
        &self,
        credential: &StorageCredential,
        target: &BlobTarget,
        blob: NewBlob,
    ) -> Result<(), StorageError> {
        let url = target.url(credential)?;

        let mut ms_headers = vec![
            ("x-ms-blob-type".to_string(), "BlockBlob".to_string()),
            (
                "x-ms-date".to_string(),
                Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ),
            ("x-ms-version".to_string(), STORAGE_SERVICE_VERSION.to_string()),
        ];
        if let Some(note) = &blob.note {
            ms_headers.push((
                format!("x-ms-meta-{}", NOTE_METADATA_KEY),
                note.trim().to_string(),
            ));
        }
        ms_headers.sort();

        let string_to_sign = shared_key_string_to_sign(
            "PUT",
            blob.data.len(),
            &blob.content_type,
            &ms_headers,
            &canonical_resource(&credential.account_name, &url),
        );
        let signature = hmac_sha256_base64(&credential.account_key, &string_to_sign)?;

        debug!(url = %url, bytes = blob.data.len(), "Putting blob");

        let mut request = self
            .http
            .put(url)
            .header(CONTENT_TYPE, blob.content_type.as_str())
            .header(
                AUTHORIZATION,
                format!("SharedKey {}:{}", credential.account_name, signature),
            );
        for (name, value) in &ms_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(blob.data).send().await?;

        let status = response.status();
        if !status.is_success() {
            let code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            error!(status = %status, code = %code, blob = %target.blob_name, "Put Blob rejected");
            return Err(StorageError::Write(format!("{} ({})", status, code)));
        }

        Ok(())
    }
}

/// `/<account><url path>`, the path as sent on the wire
fn canonical_resource(account_name: &str, url: &Url) -> String {
    format!("/{}{}", account_name, url.path())
}

/// Shared Key string-to-sign; `ms_headers` must be lowercase and sorted
fn shared_key_string_to_sign(
    verb: &str,
    content_length: usize,
    content_type: &str,
    ms_headers: &[(String, String)],
    canonical_resource: &str,
) -> String {
    // zero length is signed as an empty field
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    // verb, encoding, language, length, md5, type, date, 4x conditionals, range
    let mut out = [
        verb,
        "",
        "",
        length.as_str(),
        "",
        content_type,
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n");
    out.push('\n');

    // values are signed as the service receives them
    for (name, value) in ms_headers {
        out.push_str(name);
        out.push(':');
        out.push_str(value.trim());
        out.push('\n');
    }
    out.push_str(canonical_resource);
    out
}
