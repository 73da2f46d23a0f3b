//! Theme and Styling
//!
//! Defines colors and styles for the TUI interface.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (azure blue)
    pub const ACCENT: Color = Color::Rgb(0, 137, 214);

    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    /// Secondary text color (muted)
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Border Colors ===

    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Styles ===

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Secondary/muted text style
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Dimmed text style
    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Title style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Heading style
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Default border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border style
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Public URL style
    pub fn link() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }
}

/// Status icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const DOT: &'static str = "•";
    pub const SPINNER: [&'static str; 4] = ["◐", "◓", "◑", "◒"];
}
