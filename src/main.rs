use clap::Parser;
use public_file_share::cli::{self, Cli, Command};
use public_file_share::config::Config;
use public_file_share::utils::{default_log_dir, init_file_logging, init_server_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The terminal UI owns the screen, so its logs go to a file
    let _log_guard = match cli.command() {
        Command::Tui => Some(init_file_logging(&default_log_dir())),
        _ => {
            init_server_logging();
            None
        }
    };

    // Load configuration
    let config = Config::from_env()?;

    cli::run(cli, config).await
}
