//! Shared Access Signature minting
//!
//! Produces read-only service SAS URLs for a single blob, signed with the
//! account key (HMAC-SHA256 over the service's string-to-sign layout for
//! version 2020-12-06 and later).

use super::{BlobTarget, StorageCredential, StorageError};
use crate::storage::AccountKey;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Validity window of issued links
pub const SAS_VALIDITY_DAYS: i64 = 365;

/// Storage service version used for signing and requests
pub const STORAGE_SERVICE_VERSION: &str = "2021-08-06";

const READ_PERMISSION: &str = "r";
const BLOB_RESOURCE: &str = "b";

/// A signed, read-only blob URL
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_on: DateTime<Utc>,
}

/// Mint a read-only URL for `target`, valid for [`SAS_VALIDITY_DAYS`] from `now`
pub fn sign_blob_read_url(
    credential: &StorageCredential,
    target: &BlobTarget,
    now: DateTime<Utc>,
) -> Result<SignedUrl, StorageError> {
    let expires_on = now + Duration::days(SAS_VALIDITY_DAYS);
    let expiry = format_sas_time(expires_on);

    let canonical_resource = format!(
        "/blob/{}/{}/{}",
        credential.account_name, target.container, target.blob_name
    );

    // sp, st, se, resource, si, sip, spr, sv, sr, snapshot, ses, rscc, rscd, rsce, rscl, rsct
    let string_to_sign = [
        READ_PERMISSION,
        "",
        expiry.as_str(),
        canonical_resource.as_str(),
        "",
        "",
        "",
        STORAGE_SERVICE_VERSION,
        BLOB_RESOURCE,
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n");

    let signature = hmac_sha256_base64(&credential.account_key, &string_to_sign)
        .map_err(|e| StorageError::Signing(e.to_string()))?;

    let mut url = target
        .url(credential)
        .map_err(|e| StorageError::Signing(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("sv", STORAGE_SERVICE_VERSION)
        .append_pair("se", &expiry)
        .append_pair("sr", BLOB_RESOURCE)
        .append_pair("sp", READ_PERMISSION)
        .append_pair("sig", &signature);

    Ok(SignedUrl {
        url: url.to_string(),
        expires_on,
    })
}

/// Base64 HMAC-SHA256 of `data` under the account key
pub(crate) fn hmac_sha256_base64(key: &AccountKey, data: &str) -> Result<String, StorageError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| StorageError::Signing("account key rejected by HMAC".to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// ISO 8601 UTC without fractional seconds, as the service expects
fn format_sas_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credential() -> StorageCredential {
        StorageCredential::from_connection_string(
            "AccountName=acct;AccountKey=c2VjcmV0LWtleS1mb3ItdGVzdHM=",
        )
        .unwrap()
    }

    fn target() -> BlobTarget {
        BlobTarget::new("uploads", "public_1700000000000_abc123.txt")
    }

    #[test]
    fn test_expiry_is_one_year_out() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let signed = sign_blob_read_url(&credential(), &target(), now).unwrap();
        assert_eq!(signed.expires_on, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
        assert!(signed.url.contains("se=2024-12-31T00%3A00%3A00Z"));
    }

    #[test]
    fn test_query_is_read_only_blob_scope() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let signed = sign_blob_read_url(&credential(), &target(), now).unwrap();

        assert!(signed
            .url
            .starts_with("https://acct.blob.core.windows.net/uploads/public_1700000000000_abc123.txt?"));
        assert!(signed.url.contains("sv=2021-08-06"));
        assert!(signed.url.contains("sr=b"));
        assert!(signed.url.contains("sp=r"));
        assert!(!signed.url.contains("sp=rw"));
    }

    #[test]
    fn test_signature_matches_reference_vector() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let signed = sign_blob_read_url(&credential(), &target(), now).unwrap();
        assert!(
            signed
                .url
                .ends_with("&sig=El6KBcGXA67EDeQn%2BFKwBu0cesF9TDw7WE6tsoTsWP0%3D"),
            "{}",
            signed.url
        );
    }

    #[test]
    fn test_url_never_contains_key() {
        let signed = sign_blob_read_url(&credential(), &target(), Utc::now()).unwrap();
        assert!(!signed.url.contains("c2VjcmV0LWtleS1mb3ItdGVzdHM"));
    }
}
