//! Status messages for the operator
//!
//! stdout carries session data only, so every message here goes to stderr.
//! Colour is used only when stderr is a terminal.

use std::io::{IsTerminal, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

fn status(color: Color, symbol: &str, msg: &str) {
    let mut stderr = std::io::stderr();
    if stderr.is_terminal() {
        let _ = crossterm::execute!(
            stderr,
            SetForegroundColor(color),
            Print(symbol),
            Print(" "),
            ResetColor,
            Print(msg),
            Print("\n")
        );
    } else {
        let _ = writeln!(stderr, "{} {}", symbol, msg);
    }
}

/// Print an error message in red with an X prefix
pub fn print_error(msg: &str) {
    status(Color::Red, "✗", msg);
}

/// Print a warning message in yellow with a warning symbol prefix
pub fn print_warning(msg: &str) {
    status(Color::Yellow, "⚠", msg);
}

/// Print an informational message in cyan with an info symbol prefix
pub fn print_info(msg: &str) {
    status(Color::Cyan, "ℹ", msg);
}
