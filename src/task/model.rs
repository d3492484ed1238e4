//! Task data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier, never reused
    pub id: u32,

    pub description: String,

    /// Tags in the order they were given
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub completed: bool,

    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Task {
    /// Build a task, normalizing its tags to set semantics
    pub fn new(
        id: u32,
        description: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
        priority: Priority,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into().trim().to_string();
            if !tag.is_empty() && !unique.contains(&tag) {
                unique.push(tag);
            }
        }

        Task {
            id,
            description: description.into(),
            tags: unique,
            priority,
            completed: false,
            timestamp,
        }
    }

    /// Whether the task carries a tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Task priority; ordered `Low < Normal < High`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" | "1" => Ok(Priority::Low),
            "normal" | "n" | "2" => Ok(Priority::Normal),
            "high" | "h" | "3" => Ok(Priority::High),
            other => Err(format!(
                "Invalid priority: {}. Must be one of: low, normal, high",
                other
            )),
        }
    }
}
