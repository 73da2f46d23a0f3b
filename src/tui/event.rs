//! Event Handling
//!
//! Handles keyboard and timer events for the TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit without waiting for an in-flight upload
    ForceQuit,
    /// Upload the selected file (Enter key)
    Submit,
    /// Toggle help view
    ToggleHelp,
    /// Escape - close help
    Escape,
    /// Scroll history up one line
    ScrollUp,
    /// Scroll history down one line
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    /// Move to next field (Tab)
    NextField,
    /// Move to previous field (Shift+Tab)
    PrevField,
    /// Key for the focused text field
    Input(KeyEvent),
    /// Timer tick for the upload spinner
    Tick,
    /// Terminal size changed
    Resize,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action (input or tick)
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    /// Map a crossterm event to an app action
    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => map_key_event(key),
            Event::Resize(_, _) => Some(AppAction::Resize),
            _ => None,
        }
    }
}

/// Map a key event to an app action
pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(AppAction::ToggleHelp),

        (KeyModifiers::SHIFT, KeyCode::BackTab) => Some(AppAction::PrevField),

        (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc => Some(AppAction::Escape),
            KeyCode::Enter => Some(AppAction::Submit),
            KeyCode::F(1) => Some(AppAction::ToggleHelp),

            KeyCode::Up => Some(AppAction::ScrollUp),
            KeyCode::Down => Some(AppAction::ScrollDown),
            KeyCode::PageUp => Some(AppAction::ScrollPageUp),
            KeyCode::PageDown => Some(AppAction::ScrollPageDown),

            KeyCode::Tab => Some(AppAction::NextField),
            KeyCode::BackTab => Some(AppAction::PrevField),

            // typing, backspace, cursor movement go to the focused field
            _ => Some(AppAction::Input(key)),
        },

        _ => Some(AppAction::Input(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_shortcuts() {
        assert!(matches!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('q'))),
            Some(AppAction::Quit)
        ));
        assert!(matches!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(AppAction::ForceQuit)
        ));
    }

    #[test]
    fn test_plain_characters_are_input() {
        assert!(matches!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Char('e'))),
            Some(AppAction::Input(_))
        ));
        assert!(matches!(
            map_key_event(key(KeyModifiers::SHIFT, KeyCode::Char('?'))),
            Some(AppAction::Input(_))
        ));
        assert!(matches!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Backspace)),
            Some(AppAction::Input(_))
        ));
    }

    #[test]
    fn test_resize_and_key_release() {
        assert!(matches!(
            EventHandler::map_event(Event::Resize(80, 24)),
            Some(AppAction::Resize)
        ));

        let mut release = key(KeyModifiers::NONE, KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert!(EventHandler::map_event(Event::Key(release)).is_none());
    }

    #[test]
    fn test_enter_submits_and_tab_moves_focus() {
        assert!(matches!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(AppAction::Submit)
        ));
        assert!(matches!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::Tab)),
            Some(AppAction::NextField)
        ));
    }
}
