//! History Widget
//!
//! Lists the links issued so far, most recent first.

use crate::client::history::HistoryEntry;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the upload history
pub fn render_history(frame: &mut Frame, area: Rect, entries: &[HistoryEntry], scroll: u16) {
    let block = Block::default()
        .title(format!(" Uploaded Files ({}) ", entries.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = if entries.is_empty() {
        vec![Line::from(Span::styled("No uploads yet.", Theme::text_dim()))]
    } else {
        history_lines(entries)
    };

    let paragraph = Paragraph::new(lines).scroll((scroll, 0));
    frame.render_widget(paragraph, inner);
}

/// Number of lines the history occupies once rendered
pub fn history_height(entries: &[HistoryEntry]) -> u16 {
    history_lines(entries).len().min(u16::MAX as usize) as u16
}

fn history_lines(entries: &[HistoryEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for entry in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::DOT), Theme::text_dim()),
            Span::styled(entry.name.clone(), Theme::heading()),
            Span::styled(
                format!("  {}", entry.date.format("%Y-%m-%d %H:%M")),
                Theme::text_secondary(),
            ),
        ]));
        if !entry.note.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(entry.note.clone(), Theme::text()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(entry.url.clone(), Theme::link()),
        ]));
    }

    lines
}
