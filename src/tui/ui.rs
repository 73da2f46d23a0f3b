//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, Field, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

/// Rows taken by everything except the history list content
pub const FIXED_ROWS: u16 = 3 + 3 + 3 + 4 + 1 + 2;

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // File path
            Constraint::Length(3), // Note
            Constraint::Length(4), // Status
            Constraint::Min(5),    // History
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_input(frame, chunks[1], " File ", &app.path_input, app.focus == Field::Path);
    render_input(frame, chunks[2], " Note ", &app.note_input, app.focus == Field::Note);
    render_status(frame, chunks[3], app);
    widgets::render_history(frame, chunks[4], app.form.entries(), app.scroll_offset);
    render_status_bar(frame, chunks[5], app);

    if app.view == View::Help {
        render_help(frame);
    }
}

/// Render the header with the upload endpoint
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = vec![Line::from(vec![
        Span::styled("Public File Share", Theme::title()),
        Span::styled("  →  ", Theme::text_dim()),
        Span::styled(app.config.client.endpoint_url.clone(), Theme::text_secondary()),
    ])];

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, input: &TextArea<'_>, focused: bool) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(input, inner);
}

/// Render the outcome of the last submission
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let mut lines = Vec::new();

    if form.is_uploading() {
        let spinner = Icons::SPINNER[app.spinner_frame % Icons::SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!("{} Uploading...", spinner),
            Theme::active(),
        )));
    } else if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", Icons::ERROR, error),
            Theme::error(),
        )));
    } else if let Some(success) = form.success() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", Icons::COMPLETE, success),
            Theme::success(),
        )));
        if let Some(url) = form.public_url() {
            lines.push(Line::from(Span::styled(url.to_string(), Theme::link())));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Type a file path and press Enter to upload.",
            Theme::text_dim(),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = if app.form.is_uploading() {
        Span::styled("Uploading", Theme::active())
    } else {
        Span::styled("Ready", Theme::text_secondary())
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Upload ", Theme::shortcut_desc()),
        Span::styled("[Tab]", Theme::shortcut_key()),
        Span::styled(" Next field ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let shortcut = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        shortcut("Enter        ", "Upload the selected file"),
        shortcut("Tab          ", "Switch between file and note"),
        shortcut("↑/↓          ", "Scroll history"),
        shortcut("PageUp/Down  ", "Scroll history by page"),
        shortcut("Ctrl+Q       ", "Quit (waits for a running upload)"),
        shortcut("Ctrl+C       ", "Force quit"),
        shortcut("F1 / Ctrl+H  ", "Show this help"),
        Line::from(""),
        Line::from(Span::styled("Links stay readable for 365 days.", Theme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
