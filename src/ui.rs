//! Terminal output helpers

use colored::{Color, Colorize};
use std::io::{self, IsTerminal};

/// Print a line, coloured when a colour hint is given
pub fn print(text: &str, color: Option<Color>) {
    match color {
        Some(color) => println!("{}", text.color(color)),
        None => println!("{}", text),
    }
}

/// Print a line to stderr in the error style
pub fn print_error(text: &str) {
    eprintln!("{} {}", "Error:".red().bold(), text);
}

/// Disable colours when stdout is not a terminal
pub fn configure_colors() {
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}
