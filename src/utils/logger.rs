// Logger initialization

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "public_file_share=debug,tower_http=debug,axum=debug";
pub const LOG_FILE_NAME: &str = "public-file-share.log";

fn env_filter() -> EnvFilter {
    dotenvy::dotenv().ok();
    filter_from_env(EnvFilter::DEFAULT_ENV)
}

/// Filter from `var`, which may come from an already loaded `.env`
fn filter_from_env(var: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

/// Console logging for server and one-shot commands
///
/// Both initializers read `.env` first so `RUST_LOG` can live there.
pub fn init_server_logging() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Daily rolling file logging, used while the terminal UI owns the screen.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file_logging(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    guard
}

/// `<data dir>/public-file-share/logs`, falling back to `./logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("public-file-share").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
