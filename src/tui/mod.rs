//! Terminal User Interface Module
//!
//! Terminal counterpart of the browser upload form, built with Ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Public File Share  →  http://localhost:3000/api/...      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─ File ──────────────────────────────────────────────────┐   │
//! │  │ ~/Documents/report.pdf                                   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Note ──────────────────────────────────────────────────┐   │
//! │  │ Add a note (optional)                                    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Status ────────────────────────────────────────────────┐   │
//! │  │ ✓ File uploaded successfully!                            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Uploaded Files (3) ────────────────────────────────────┐   │
//! │  │ • report.pdf  2026-10-18 09:12                           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  [Enter] Upload | [Tab] Next field | [Ctrl+Q] Quit | [F1] Help  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, Field, View};
pub use event::{AppAction, EventHandler};

use crate::client::{HttpUploader, JsonFileHistory, UploadForm};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: crate::config::Config) -> anyhow::Result<()> {
    info!("Starting TUI mode");

    let history = JsonFileHistory::with_path(&config.client.history_path);
    let form = UploadForm::load(Box::new(history)).await;
    let uploader = Arc::new(HttpUploader::new(config.client.endpoint_url.clone()));

    // Initialize terminal
    let mut terminal = init_terminal()?;

    let mut app = App::new(config, form, uploader);

    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// What woke the main loop
enum Wake {
    Action(Option<AppAction>),
    Upload(Option<AppEvent>),
}

/// Main application loop
///
/// Sleeps until user input, a timer tick or a finished upload; idle ticks
/// do not redraw.
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    let mut redraw = true;
    loop {
        if redraw {
            let height = terminal.size()?.height;
            app.update_scroll_bounds(
                widgets::history_height(app.form.entries()),
                height.saturating_sub(ui::FIXED_ROWS),
            );
            terminal.draw(|frame| ui::render(frame, app))?;
        }

        let wake = tokio::select! {
            action = events.next() => Wake::Action(action),
            event = app.next_event() => Wake::Upload(event),
        };

        // idle ticks change nothing on screen
        redraw = !matches!(wake, Wake::Action(Some(AppAction::Tick))) || app.form.is_uploading();

        match wake {
            Wake::Action(Some(AppAction::Quit)) => {
                if app.confirm_quit() {
                    break;
                }
            }
            Wake::Action(Some(AppAction::ForceQuit)) | Wake::Action(None) => break,
            Wake::Action(Some(action)) => app.handle_action(action).await,
            Wake::Upload(Some(event)) => app.handle_event(event).await,
            Wake::Upload(None) => {}
        }

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
