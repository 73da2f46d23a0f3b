//! Upload History Storage
//!
//! The client remembers its own uploads locally. Persistence sits behind
//! [`HistoryStore`] so the medium can change without touching form logic:
//! a JSON file for the native clients, memory for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, info};

/// Same name the browser page uses for its `localStorage` key
pub const HISTORY_FILE: &str = "public_uploaded_files.json";

/// One past upload, most recent first in every list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    /// Original file name
    pub name: String,
    #[serde(default)]
    pub note: String,
    pub date: DateTime<Utc>,
}

/// Read-on-init / write-on-change persistence for history entries
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>>;

    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<()>;
}

/// Default history location under the user's data directory
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("public-file-share")
        .join(HISTORY_FILE)
}

/// History kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new() -> Self {
        Self::with_path(default_history_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistory {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<HistoryEntry> = serde_json::from_str(&content)?;

        info!("Loaded {} history entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content).await?;

        debug!("Saved {} history entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

/// In-process history; lost when dropped
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        Ok(self.snapshot())
    }

    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        *stored = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry(name: &str, note: &str) -> HistoryEntry {
        HistoryEntry {
            url: format!("https://acct.blob.core.windows.net/uploads/{}?sig=x", name),
            name: name.to_string(),
            note: note.to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_history_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(HISTORY_FILE);
        let store = JsonFileHistory::with_path(&path);

        let entries = vec![entry("b.png", "second"), entry("a.txt", "")];
        store.save(&entries).await.unwrap();

        // a fresh store over the same file sees the same list
        let reloaded = JsonFileHistory::with_path(&path).load().await.unwrap();
        assert_eq!(reloaded, entries);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileHistory::with_path(temp_dir.path().join("none.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_browser_shaped_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(HISTORY_FILE);
        tokio::fs::write(
            &path,
            r#"[{"url":"https://x/y?sig=1","name":"cat.jpg","note":"","date":"2024-05-01T12:30:00.000Z"}]"#,
        )
        .await
        .unwrap();

        let entries = JsonFileHistory::with_path(&path).load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "cat.jpg");
        assert_eq!(entries[0].date, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(HISTORY_FILE);
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(JsonFileHistory::with_path(&path).load().await.is_err());
    }

    #[tokio::test]
    async fn test_memory_history() {
        let store = MemoryHistory::new();
        store.save(&[entry("a.txt", "n")]).await.unwrap();
        assert_eq!(store.load().await.unwrap(), vec![entry("a.txt", "n")]);
    }
}
