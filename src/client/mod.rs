//! Client Side
//!
//! Native counterpart of the browser form: upload a file, keep a local
//! history of issued links.

pub mod api;
pub mod form;
pub mod history;

pub use api::{HttpUploader, SelectedFile, UploadFailure, Uploader};
pub use form::UploadForm;
pub use history::{HistoryEntry, HistoryStore, JsonFileHistory, MemoryHistory};
