//! Storage Connection String Parsing
//!
//! Extracts the account name, the symmetric account key and the blob endpoint
//! from an Azure Storage connection string such as:
//!
//! ```text
//! DefaultEndpointsProtocol=https;AccountName=myacct;AccountKey=<base64>;EndpointSuffix=core.windows.net
//! ```
//!
//! Parsing fails closed: a credential without a usable key is an error, never
//! an empty key.

use super::StorageError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::collections::HashMap;

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

// Azurite emulator well-known account
const EMULATOR_ACCOUNT_NAME: &str = "devstoreaccount1";
const EMULATOR_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const EMULATOR_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Decoded account key bytes (redacted in `Debug`)
#[derive(Clone)]
pub struct AccountKey(Vec<u8>);

impl AccountKey {
    /// Decode a base64 account key
    pub fn from_base64(encoded: &str) -> Result<Self, StorageError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| StorageError::Credential("AccountKey is not valid base64".to_string()))?;
        if bytes.is_empty() {
            return Err(StorageError::Credential(
                "Could not parse AccountKey from connection string".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccountKey([REDACTED])")
    }
}

/// Shared Key credential for one storage account
#[derive(Debug, Clone)]
pub struct StorageCredential {
    pub account_name: String,
    pub account_key: AccountKey,
    /// Blob service endpoint without trailing slash
    pub blob_endpoint: String,
}

impl StorageCredential {
    /// Parse a connection string
    pub fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        let fields = parse_fields(connection_string);

        let development = fields
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        if development {
            let blob_endpoint = fields
                .get("blobendpoint")
                .filter(|e| !e.is_empty())
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| EMULATOR_BLOB_ENDPOINT.to_string());
            return Ok(Self {
                account_name: EMULATOR_ACCOUNT_NAME.to_string(),
                account_key: AccountKey::from_base64(EMULATOR_ACCOUNT_KEY)?,
                blob_endpoint,
            });
        }

        let account_name = fields
            .get("accountname")
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| {
                StorageError::Credential(
                    "Could not parse AccountName from connection string".to_string(),
                )
            })?;

        let account_key = fields
            .get("accountkey")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                StorageError::Credential(
                    "Could not parse AccountKey from connection string".to_string(),
                )
            })
            .and_then(|key| AccountKey::from_base64(key))?;

        let blob_endpoint = match fields.get("blobendpoint").filter(|e| !e.is_empty()) {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let protocol = fields
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = fields
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                format!("{}://{}.blob.{}", protocol, account_name, suffix)
            }
        };

        Ok(Self {
            account_name,
            account_key,
            blob_endpoint,
        })
    }
}

/// Split `Key=Value;` pairs; keys are case-insensitive, values may contain `=`
fn parse_fields(connection_string: &str) -> HashMap<String, String> {
    connection_string
        .split(';')
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            let (key, value) = segment.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "c2VjcmV0LWtleS1mb3ItdGVzdHM=";

    #[test]
    fn test_parse_standard_connection_string() {
        let conn = format!(
            "DefaultEndpointsProtocol=https;AccountName=myacct;AccountKey={};EndpointSuffix=core.windows.net",
            KEY
        );
        let credential = StorageCredential::from_connection_string(&conn).unwrap();

        assert_eq!(credential.account_name, "myacct");
        assert_eq!(credential.account_key.as_bytes(), b"secret-key-for-tests");
        assert_eq!(credential.blob_endpoint, "https://myacct.blob.core.windows.net");
    }

    #[test]
    fn test_key_padding_survives_split() {
        // the trailing '=' padding must not be treated as a separator
        let conn = format!("AccountName=a;AccountKey={};", KEY);
        let credential = StorageCredential::from_connection_string(&conn).unwrap();
        assert_eq!(credential.account_key.as_bytes(), b"secret-key-for-tests");
    }

    #[test]
    fn test_explicit_blob_endpoint_wins() {
        let conn = format!(
            "AccountName=a;AccountKey={};BlobEndpoint=http://localhost:9000/a/",
            KEY
        );
        let credential = StorageCredential::from_connection_string(&conn).unwrap();
        assert_eq!(credential.blob_endpoint, "http://localhost:9000/a");
    }

    #[test]
    fn test_sovereign_cloud_suffix() {
        let conn = format!(
            "DefaultEndpointsProtocol=http;AccountName=a;AccountKey={};EndpointSuffix=core.chinacloudapi.cn",
            KEY
        );
        let credential = StorageCredential::from_connection_string(&conn).unwrap();
        assert_eq!(credential.blob_endpoint, "http://a.blob.core.chinacloudapi.cn");
    }

    #[test]
    fn test_development_storage() {
        let credential =
            StorageCredential::from_connection_string("UseDevelopmentStorage=true").unwrap();
        assert_eq!(credential.account_name, "devstoreaccount1");
        assert_eq!(credential.blob_endpoint, EMULATOR_BLOB_ENDPOINT);
    }

    #[test]
    fn test_missing_key_fails_closed() {
        for conn in [
            "AccountName=a",
            "AccountName=a;AccountKey=",
            "AccountName=a;AccountKey=***not-base64***",
        ] {
            let err = StorageCredential::from_connection_string(conn).unwrap_err();
            assert!(matches!(err, StorageError::Credential(_)), "{}", conn);
        }
    }

    #[test]
    fn test_missing_account_name() {
        let err = StorageCredential::from_connection_string(&format!("AccountKey={}", KEY))
            .unwrap_err();
        assert!(err.to_string().contains("AccountName"));
    }

    #[test]
    fn test_errors_and_debug_do_not_leak_key() {
        let conn = "AccountName=a;AccountKey=%%%%";
        let err = StorageCredential::from_connection_string(conn).unwrap_err();
        assert!(!err.to_string().contains("%%%%"));

        let credential =
            StorageCredential::from_connection_string(&format!("AccountName=a;AccountKey={}", KEY))
                .unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains(KEY));
        assert!(debug.contains("REDACTED"));
    }
}
