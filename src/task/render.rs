//! Turning tasks into display text

use crate::task::model::{Priority, Task};
use chrono::SecondsFormat;
use colored::Color;
use std::fmt;
use std::str::FromStr;

/// Output layouts for a single task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// One line per task
    #[default]
    Compact,
    /// One line per field
    Detailed,
    /// One JSON object per line
    Json,
}

impl Format {
    pub const NAMES: [&'static str; 3] = ["compact", "detailed", "json"];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Compact => "compact",
            Format::Detailed => "detailed",
            Format::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "compact" | "simple" => Ok(Format::Compact),
            "detailed" | "verbose" => Ok(Format::Detailed),
            "json" => Ok(Format::Json),
            other => Err(format!(
                "Invalid format: {}. Must be one of: {}",
                other,
                Format::NAMES.join(", ")
            )),
        }
    }
}

/// Render a task in the chosen layout
pub fn render(task: &Task, format: Format) -> String {
    match format {
        Format::Compact => render_compact(task),
        Format::Detailed => render_detailed(task),
        Format::Json => render_json(task),
    }
}

fn render_compact(task: &Task) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{}. {} {}", task.id, mark, task.description);
    for tag in &task.tags {
        line.push_str(" #");
        line.push_str(tag);
    }
    line
}

fn render_detailed(task: &Task) -> String {
    let tags = if task.tags.is_empty() {
        "-".to_string()
    } else {
        task.tags.join(", ")
    };

    format!(
        "ID:          {}\nDescription: {}\nTags:        {}\nPriority:    {}\nCompleted:   {}\nCreated:     {}",
        task.id,
        task.description,
        tags,
        task.priority,
        if task.completed { "yes" } else { "no" },
        task.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

fn render_json(task: &Task) -> String {
    // Task holds only strings, numbers and a timestamp; serializing cannot fail.
    serde_json::to_string(task).unwrap_or_default()
}

/// Colour used when printing a task of the given priority
pub fn priority_color(priority: Priority) -> Option<Color> {
    match priority {
        Priority::High => Some(Color::BrightRed),
        Priority::Low => Some(Color::BrightCyan),
        Priority::Normal => None,
    }
}
