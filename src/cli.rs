//! Command line
//!
//! `serve` runs the upload endpoint; `upload`, `history` and `tui` are the
//! native clients sharing one local history file.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use crate::client::{HistoryEntry, HttpUploader, JsonFileHistory, SelectedFile, UploadForm, Uploader};
use crate::config::Config;
use crate::models::AppState;
use crate::routes::create_router;

/// Share files through a public, time-limited blob link.
#[derive(Parser, Debug)]
#[command(name = "public-file-share", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Upload one file and print its public link.
    Upload {
        /// File to upload.
        path: PathBuf,
        /// Note stored with the blob and in the local history.
        #[arg(long, default_value = "")]
        note: String,
        /// Upload endpoint, overrides PUBLIC_SHARE_URL.
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print previously issued links, most recent first.
    History {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Start the terminal client.
    Tui,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}

/// Run the HTTP server until it stops
pub async fn serve(config: Config) -> Result<()> {
    info!("Configuration loaded: {:?}", config.server);
    if !config.storage.is_configured() {
        tracing::warn!("Azure storage env vars not set; uploads will fail until they are");
    }

    let addr = (config.server.host.clone(), config.server.port);
    let state = AppState::new(config);
    let app = create_router(state);

    let listener = TcpListener::bind((addr.0.as_str(), addr.1)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Upload `path` through `uploader`, recording the link in `form`'s history
pub async fn upload_file(
    form: &mut UploadForm,
    uploader: &dyn Uploader,
    path: &std::path::Path,
    note: &str,
) -> Result<String> {
    let file = SelectedFile::from_path(path).await?;
    form.select_file(Some(file));
    form.set_note(note);
    form.submit(uploader).await;

    match (form.public_url(), form.error()) {
        (Some(url), _) => Ok(url.to_string()),
        (None, Some(message)) => bail!("{}", message),
        (None, None) => bail!("Upload failed"),
    }
}

/// Plain-text history listing
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No uploads yet.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{}  {}\n",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.name
        ));
        if !entry.note.is_empty() {
            out.push_str(&format!("    {}\n", entry.note));
        }
        out.push_str(&format!("    {}\n", entry.url));
    }
    out
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command() {
        Command::Serve => serve(config).await,
        Command::Upload {
            path,
            note,
            endpoint,
        } => {
            let endpoint = endpoint
                .clone()
                .unwrap_or_else(|| config.client.endpoint_url.clone());
            let uploader = HttpUploader::new(endpoint);
            let history = JsonFileHistory::with_path(&config.client.history_path);
            let mut form = UploadForm::load(Box::new(history)).await;

            let url = upload_file(&mut form, &uploader, path, note).await?;
            println!("{}", url);
            Ok(())
        }
        Command::History { json } => {
            let history = JsonFileHistory::with_path(&config.client.history_path);
            let form = UploadForm::load(Box::new(history)).await;
            if *json {
                println!("{}", serde_json::to_string_pretty(form.entries())?);
            } else {
                print!("{}", format_history(form.entries()));
            }
            Ok(())
        }
        Command::Tui => crate::tui::run(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MemoryHistory, UploadFailure};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    struct StaticUploader(Result<String, UploadFailure>);

    #[async_trait]
    impl Uploader for StaticUploader {
        async fn upload(&self, _file: &SelectedFile, _note: &str) -> Result<String, UploadFailure> {
            self.0.clone()
        }
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["public-file-share"]).unwrap();
        assert_eq!(cli.command(), &Command::Serve);
    }

    #[test]
    fn test_parse_upload_args() {
        let cli = Cli::try_parse_from([
            "public-file-share",
            "upload",
            "report.pdf",
            "--note",
            "for review",
            "--endpoint",
            "http://share.test/api/upload-public-file",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            &Command::Upload {
                path: PathBuf::from("report.pdf"),
                note: "for review".to_string(),
                endpoint: Some("http://share.test/api/upload-public-file".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_history_json_flag() {
        let cli = Cli::try_parse_from(["public-file-share", "history", "--json"]).unwrap();
        assert_eq!(cli.command(), &Command::History { json: true });
    }

    #[tokio::test]
    async fn test_upload_file_records_history() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        tokio::fs::write(&path, b"%PDF").await.unwrap();

        let mut form = UploadForm::load(Box::new(MemoryHistory::new())).await;
        let uploader = StaticUploader(Ok("https://share.test/report.pdf?sig=x".to_string()));

        let url = upload_file(&mut form, &uploader, &path, "draft").await.unwrap();
        assert_eq!(url, "https://share.test/report.pdf?sig=x");
        assert_eq!(form.entries()[0].name, "report.pdf");
        assert_eq!(form.entries()[0].note, "draft");
    }

    #[tokio::test]
    async fn test_upload_file_surfaces_server_message() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        tokio::fs::write(&path, b"a").await.unwrap();

        let mut form = UploadForm::load(Box::new(MemoryHistory::new())).await;
        let uploader = StaticUploader(Err(UploadFailure::new("Azure storage env vars not set")));

        let err = upload_file(&mut form, &uploader, &path, "").await.unwrap_err();
        assert_eq!(err.to_string(), "Azure storage env vars not set");
        assert!(form.entries().is_empty());
    }

    #[test]
    fn test_format_history() {
        let entries = vec![HistoryEntry {
            url: "https://share.test/a".to_string(),
            name: "a.txt".to_string(),
            note: "hello".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }];

        assert_eq!(
            format_history(&entries),
            "2024-01-02 03:04  a.txt\n    hello\n    https://share.test/a\n"
        );
        assert_eq!(format_history(&[]), "No uploads yet.\n");
    }
}
