//! TUI Widgets

mod history;

pub use history::{history_height, render_history};
