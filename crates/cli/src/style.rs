//! Terminal styling for git-pair output.

use console::Style;

/// A note the user should read (yellow).
pub fn note(msg: &str) -> String {
    Style::new().yellow().apply_to(msg).to_string()
}

/// An error message (red).
pub fn error(msg: &str) -> String {
    Style::new().red().apply_to(msg).to_string()
}

/// A value that was just written (bold).
pub fn value(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Secondary information (dim).
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}
