//! Upload form state
//!
//! Front-end independent logic behind the upload form: selected file, note,
//! in-flight flag, messages, last issued link and the local history list.
//! Both the CLI and the terminal UI drive this type.

use chrono::Utc;
use tracing::{info, warn};

use super::api::{SelectedFile, UploadFailure, Uploader};
use super::history::{HistoryEntry, HistoryStore};

pub const NO_FILE_MESSAGE: &str = "Please select a file.";
pub const SUCCESS_MESSAGE: &str = "File uploaded successfully!";

/// A submission accepted by [`UploadForm::begin_submit`]
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file: SelectedFile,
    pub note: String,
}

pub struct UploadForm {
    store: Box<dyn HistoryStore>,
    file: Option<SelectedFile>,
    note: String,
    uploading: bool,
    error: Option<String>,
    success: Option<String>,
    public_url: Option<String>,
    entries: Vec<HistoryEntry>,
}

impl UploadForm {
    /// Create the form and read the stored history once
    pub async fn load(store: Box<dyn HistoryStore>) -> Self {
        let entries = match store.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not read upload history, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            store,
            file: None,
            note: String::new(),
            uploading: false,
            error: None,
            success: None,
            public_url: None,
            entries,
        }
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.file = file;
        self.public_url = None;
        self.error = None;
        self.success = None;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Report a problem found before submission (e.g. unreadable path)
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.success = None;
    }

    /// Validate and mark the form as uploading
    ///
    /// Returns `None` when there is nothing to send: no file selected (an
    /// error message is set) or an upload already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingUpload> {
        if self.uploading {
            return None;
        }

        self.error = None;
        self.success = None;
        self.public_url = None;

        let Some(file) = self.file.clone() else {
            self.error = Some(NO_FILE_MESSAGE.to_string());
            return None;
        };

        self.uploading = true;
        Some(PendingUpload {
            file,
            note: self.note.clone(),
        })
    }

    /// Apply the uploader's answer for `pending`
    pub async fn finish_submit(
        &mut self,
        pending: PendingUpload,
        result: Result<String, UploadFailure>,
    ) {
        self.uploading = false;

        match result {
            Ok(url) => {
                info!(file = %pending.file.name, "Upload succeeded");
                self.success = Some(SUCCESS_MESSAGE.to_string());
                self.public_url = Some(url.clone());
                self.entries.insert(
                    0,
                    HistoryEntry {
                        url,
                        name: pending.file.name,
                        note: pending.note,
                        date: Utc::now(),
                    },
                );
                if let Err(e) = self.store.save(&self.entries).await {
                    warn!("Could not persist upload history: {}", e);
                }
                self.file = None;
                self.note.clear();
            }
            Err(failure) => {
                warn!(file = %pending.file.name, "Upload failed: {}", failure);
                self.error = Some(failure.message);
            }
        }
    }

    /// Full submit cycle against `uploader`
    pub async fn submit(&mut self, uploader: &dyn Uploader) {
        let Some(pending) = self.begin_submit() else {
            return;
        };
        let result = uploader.upload(&pending.file, &pending.note).await;
        self.finish_submit(pending, result).await;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }

    /// History, most recent first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
