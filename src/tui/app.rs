//! Application State
//!
//! Contains the TUI state: two text fields feeding an [`UploadForm`], and the
//! channel that brings finished uploads back from their background task.

use crate::client::api::{SelectedFile, UploadFailure, Uploader};
use crate::client::form::{PendingUpload, UploadForm};
use crate::config::Config;
use crate::tui::event::AppAction;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tui_textarea::TextArea;

const PATH_PLACEHOLDER: &str = "Path of the file to share...";
const NOTE_PLACEHOLDER: &str = "Add a note (optional)";

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Form,
    Help,
}

/// Focused input field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Field {
    #[default]
    Path,
    Note,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Path => Field::Note,
            Field::Note => Field::Path,
        }
    }
}

/// Events from background upload tasks
#[derive(Debug)]
pub enum AppEvent {
    UploadFinished {
        pending: PendingUpload,
        result: Result<String, UploadFailure>,
    },
}

/// Main application state
pub struct App {
    pub config: Config,

    // UI State
    pub view: View,
    pub focus: Field,
    pub should_quit: bool,
    pub spinner_frame: usize,

    // Inputs
    pub path_input: TextArea<'static>,
    pub note_input: TextArea<'static>,

    // Form + history
    pub form: UploadForm,
    pub scroll_offset: u16,
    pub max_scroll: u16,

    uploader: Arc<dyn Uploader>,
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, form: UploadForm, uploader: Arc<dyn Uploader>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);

        Self {
            config,
            view: View::Form,
            focus: Field::Path,
            should_quit: false,
            spinner_frame: 0,
            path_input: text_input(PATH_PLACEHOLDER),
            note_input: text_input(NOTE_PLACEHOLDER),
            form,
            scroll_offset: 0,
            max_scroll: 0,
            uploader,
            event_rx,
            event_tx,
        }
    }

    /// Quit only once no upload is in flight
    pub fn confirm_quit(&self) -> bool {
        !self.form.is_uploading()
    }

    /// Wait for the next finished upload
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    /// Apply a finished upload
    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::UploadFinished { pending, result } => {
                let succeeded = result.is_ok();
                self.form.finish_submit(pending, result).await;
                if succeeded {
                    self.path_input = text_input(PATH_PLACEHOLDER);
                    self.note_input = text_input(NOTE_PLACEHOLDER);
                    self.focus = Field::Path;
                    self.scroll_offset = 0;
                }
            }
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => {
                if self.view == View::Form {
                    self.submit_upload().await;
                } else {
                    self.view = View::Form;
                }
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Form
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                self.view = View::Form;
            }
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                if self.scroll_offset < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
            }
            AppAction::NextField | AppAction::PrevField => {
                self.focus = self.focus.next();
            }
            AppAction::Input(key_event) => {
                if self.view == View::Help {
                    self.view = View::Form;
                    return;
                }
                match self.focus {
                    Field::Path => {
                        self.path_input.input(key_event);
                    }
                    Field::Note => {
                        self.note_input.input(key_event);
                    }
                }
            }
            AppAction::Resize => {}
            AppAction::Tick => {
                if self.form.is_uploading() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
        }
    }

    /// Read the selected path and hand the upload to a background task
    async fn submit_upload(&mut self) {
        if self.form.is_uploading() {
            return;
        }

        let path = field_text(&self.path_input);
        let note = self.note_input.lines().join(" ");

        if path.is_empty() {
            self.form.select_file(None);
        } else {
            match SelectedFile::from_path(Path::new(&path)).await {
                Ok(file) => self.form.select_file(Some(file)),
                Err(e) => {
                    self.form.set_error(format!("Could not read {}: {}", path, e));
                    return;
                }
            }
        }
        self.form.set_note(note);

        let Some(pending) = self.form.begin_submit() else {
            return;
        };

        info!(file = %pending.file.name, "Starting upload");

        let uploader = Arc::clone(&self.uploader);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = uploader.upload(&pending.file, &pending.note).await;
            tx.send(AppEvent::UploadFinished { pending, result }).await.ok();
        });
    }

    /// Update max scroll based on history length
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }
}

fn text_input(placeholder: &'static str) -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(placeholder);
    input
}

fn field_text(input: &TextArea<'_>) -> String {
    input.lines().join("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::form::NO_FILE_MESSAGE;
    use crate::client::history::MemoryHistory;
    use crate::config::StorageConfig;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;
    use tempfile::TempDir;

    struct EchoUploader;

    #[async_trait]
    impl Uploader for EchoUploader {
        async fn upload(&self, file: &SelectedFile, _note: &str) -> Result<String, UploadFailure> {
            Ok(format!("https://share.test/{}", file.name))
        }
    }

    async fn app() -> App {
        let form = UploadForm::load(Box::new(MemoryHistory::new())).await;
        App::new(
            Config::local(StorageConfig::default()),
            form,
            Arc::new(EchoUploader),
        )
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::Input(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .await;
        }
    }

    #[tokio::test]
    async fn test_submit_without_path_shows_error() {
        let mut app = app().await;
        app.handle_action(AppAction::Submit).await;
        assert_eq!(app.form.error(), Some(NO_FILE_MESSAGE));
        assert!(!app.form.is_uploading());
    }

    #[tokio::test]
    async fn test_unreadable_path_shows_error() {
        let mut app = app().await;
        type_text(&mut app, "/definitely/not/here.txt").await;
        app.handle_action(AppAction::Submit).await;
        assert!(app.form.error().unwrap().starts_with("Could not read"));
    }

    #[tokio::test]
    async fn test_upload_lands_in_history() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.txt");
        tokio::fs::write(&path, "hi").await.unwrap();

        let mut app = app().await;
        type_text(&mut app, &path.to_string_lossy()).await;
        app.handle_action(AppAction::NextField).await;
        type_text(&mut app, "greeting").await;
        app.handle_action(AppAction::Submit).await;
        assert!(app.form.is_uploading());

        let event = tokio::time::timeout(Duration::from_secs(5), app.next_event())
            .await
            .unwrap()
            .unwrap();
        app.handle_event(event).await;
        assert!(!app.form.is_uploading());

        assert_eq!(app.form.public_url(), Some("https://share.test/hello.txt"));
        assert_eq!(app.form.entries()[0].note, "greeting");
        assert_eq!(field_text(&app.path_input), "");
        assert_eq!(app.focus, Field::Path);
    }

    #[tokio::test]
    async fn test_idle_app_waits_for_events() {
        let mut app = app().await;
        let waited = tokio::time::timeout(Duration::from_millis(50), app.next_event()).await;
        assert!(waited.is_err());
    }
}
