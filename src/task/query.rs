//! Filtering, sorting and tag aggregation over task lists

use crate::task::model::Task;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keep the tasks matching a predicate, preserving their order
pub fn filter<F>(tasks: Vec<Task>, predicate: F) -> Vec<Task>
where
    F: Fn(&Task) -> bool,
{
    tasks.into_iter().filter(|t| predicate(t)).collect()
}

/// The listing filters understood by `yata list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks carrying exactly this tag
    pub tag: Option<String>,

    /// Only tasks whose description contains this text (case-sensitive)
    pub description: Option<String>,

    /// Show completed tasks too
    pub include_completed: bool,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_completed(mut self, include: bool) -> Self {
        self.include_completed = include;
        self
    }

    /// Whether a task passes every active filter
    pub fn matches(&self, task: &Task) -> bool {
        let tag_ok = self.tag.as_deref().map_or(true, |tag| task.has_tag(tag));
        let description_ok = self
            .description
            .as_deref()
            .map_or(true, |text| task.description.contains(text));
        let completion_ok = self.include_completed || !task.completed;

        tag_ok && description_ok && completion_ok
    }

    /// Apply the filter to a task list
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        filter(tasks, |t| self.matches(t))
    }
}

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// High priority first
    Priority,
    Description,
    /// Oldest first
    Timestamp,
    #[default]
    Id,
}

impl SortField {
    pub const NAMES: [&'static str; 4] = ["priority", "description", "timestamp", "id"];

    /// Parse a field name, falling back to ID order for anything unknown
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::Description => "description",
            SortField::Timestamp => "timestamp",
            SortField::Id => "id",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(SortField::Priority),
            "description" => Ok(SortField::Description),
            "timestamp" => Ok(SortField::Timestamp),
            "id" => Ok(SortField::Id),
            other => Err(format!(
                "Invalid sort field: {}. Must be one of: {}",
                other,
                SortField::NAMES.join(", ")
            )),
        }
    }
}

/// Stable sort of a task list by one field
pub fn sort(tasks: &mut [Task], field: SortField) {
    match field {
        SortField::Priority => tasks.sort_by_key(|t| Reverse(t.priority)),
        SortField::Description => tasks.sort_by(|a, b| a.description.cmp(&b.description)),
        SortField::Timestamp => tasks.sort_by_key(|t| t.timestamp),
        SortField::Id => tasks.sort_by_key(|t| t.id),
    }
}

/// Count how many tasks carry each tag, keyed in lexicographic order
pub fn tag_counts(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        for tag in &task.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Tag aggregation lines, with tag names padded to the widest one
pub fn tag_lines(tasks: &[Task]) -> Vec<String> {
    let counts = tag_counts(tasks);
    let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    counts
        .iter()
        .map(|(tag, count)| format!("{:<width$}\t{}", tag, count, width = width))
        .collect()
}
