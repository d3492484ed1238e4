//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, logging setup, shell
//! completion and the handlers behind each command.

pub mod app;
pub mod commands;
pub mod logging;

// Re-export main types
pub use app::*;
pub use logging::{init_logging, Verbosity};
