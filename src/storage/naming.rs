//! Public blob naming
//!
//! Names look like `public_<unix millis>_<6 base-36 chars>.<ext>`. The random
//! suffix gives 36^6 (about 2.2 billion) values per millisecond, so collisions
//! are unlikely but not impossible; nothing detects or prevents them.

use chrono::Utc;
use rand::Rng;

pub const BLOB_NAME_PREFIX: &str = "public";
pub const DEFAULT_EXTENSION: &str = "bin";
pub const SUFFIX_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh blob name for an uploaded file
pub fn generate_blob_name(original_file_name: Option<&str>) -> String {
    generate_blob_name_at(Utc::now().timestamp_millis(), original_file_name)
}

/// Generate a blob name for a given timestamp (milliseconds since the epoch)
pub fn generate_blob_name_at(unix_millis: i64, original_file_name: Option<&str>) -> String {
    format!(
        "{}_{}_{}.{}",
        BLOB_NAME_PREFIX,
        unix_millis,
        random_suffix(),
        file_extension(original_file_name)
    )
}

/// Final dot-segment of the original file name, or `bin`
pub fn file_extension(original_file_name: Option<&str>) -> &str {
    original_file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION)
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// `public_<digits>_<6 lowercase alphanumerics>.<non-empty ext>`
    fn is_well_formed(name: &str) -> bool {
        let Some(rest) = name.strip_prefix("public_") else {
            return false;
        };
        let Some((millis, rest)) = rest.split_once('_') else {
            return false;
        };
        let Some((suffix, ext)) = rest.split_once('.') else {
            return false;
        };
        !millis.is_empty()
            && millis.chars().all(|c| c.is_ascii_digit())
            && suffix.len() == SUFFIX_LEN
            && suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
            && !ext.is_empty()
    }

    #[test]
    fn test_extension_from_file_name() {
        assert_eq!(file_extension(Some("report.pdf")), "pdf");
        assert_eq!(file_extension(Some("archive.tar.gz")), "gz");
        assert_eq!(file_extension(Some(".env")), "env");
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(file_extension(None), "bin");
        assert_eq!(file_extension(Some("")), "bin");
        assert_eq!(file_extension(Some("README")), "bin");
        assert_eq!(file_extension(Some("trailing.")), "bin");
    }

    #[test]
    fn test_generated_names_match_pattern() {
        for original in [Some("photo.JPG"), Some("notes"), None] {
            let name = generate_blob_name(original);
            assert!(is_well_formed(&name), "{}", name);
        }
        let name = generate_blob_name_at(1_700_000_000_123, Some("a.txt"));
        assert!(name.starts_with("public_1700000000123_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_same_millisecond_names_rarely_collide() {
        // 10^5 draws from 36^6 suffixes: the birthday bound expects ~2.3 repeats
        let samples = 100_000;
        let mut seen = HashSet::with_capacity(samples);
        let mut collisions = 0;
        for _ in 0..samples {
            if !seen.insert(generate_blob_name_at(42, Some("f.bin"))) {
                collisions += 1;
            }
        }
        assert!(collisions <= 16, "{} collisions", collisions);
    }

    #[test]
    fn test_small_batches_are_unique() {
        let names: HashSet<_> = (0..500).map(|_| generate_blob_name_at(7, None)).collect();
        assert_eq!(names.len(), 500);
    }
}
