//! Command handlers

use crate::config::{parse_value, ConfigManager, Paths};
use crate::sync::backend_from_config;
use crate::task::{priority_color, render, sort, tag_lines, Format, Priority, SortField, TaskFilter, TaskStore};
use crate::ui;
use anyhow::{anyhow, Context as _, Result};
use clap::{ArgMatches, Command};
use clap_complete::Shell;
use std::io;

/// `yata new`
pub fn new_task(paths: &Paths, matches: &ArgMatches) -> Result<()> {
    let description = matches
        .get_many::<String>("description")
        .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let tags: Vec<String> = matches
        .get_many::<String>("tag")
        .map(|tags| tags.cloned().collect())
        .unwrap_or_default();
    let priority = parse_arg::<Priority>(matches, "priority")?.unwrap_or_default();

    let task = TaskStore::new(paths)
        .create(&description, tags, priority)
        .context("failed to create task")?;

    ui::print(&format!("Created task {}", task.id), None);
    Ok(())
}

/// `yata list`
pub fn list(paths: &Paths, matches: &ArgMatches) -> Result<()> {
    let store = TaskStore::new(paths);
    let tasks = store.get_all().context("failed to load tasks")?;

    if matches.get_flag("show-tags") {
        for line in tag_lines(&tasks) {
            ui::print(&line, None);
        }
        return Ok(());
    }

    let mut filter = TaskFilter::new().with_completed(matches.get_flag("all"));
    if let Some(tag) = matches.get_one::<String>("tag") {
        filter = filter.with_tag(tag.clone());
    }
    if let Some(text) = matches.get_one::<String>("description") {
        filter = filter.with_description(text.clone());
    }

    let field = matches
        .get_one::<String>("sort")
        .map(|name| SortField::from_name(name))
        .unwrap_or_default();
    let format = parse_arg::<Format>(matches, "format")?.unwrap_or_default();

    let mut tasks = filter.apply(tasks);
    sort(&mut tasks, field);

    for task in &tasks {
        ui::print(&render(task, format), priority_color(task.priority));
    }
    Ok(())
}

/// `yata show`
pub fn show(paths: &Paths, matches: &ArgMatches) -> Result<()> {
    let id = required_id(matches)?;
    let format = parse_arg::<Format>(matches, "format")?.unwrap_or(Format::Detailed);

    let task = TaskStore::new(paths)
        .get(id)
        .with_context(|| format!("failed to show task {}", id))?;

    ui::print(&render(&task, format), priority_color(task.priority));
    Ok(())
}

/// `yata complete`
pub fn complete(paths: &Paths, matches: &ArgMatches) -> Result<()> {
    let store = TaskStore::new(paths);
    let ids: Vec<u32> = matches
        .get_many::<u32>("id")
        .map(|ids| ids.copied().collect())
        .unwrap_or_default();

    for id in ids {
        store
            .complete(id)
            .with_context(|| format!("failed to complete task {}", id))?;
        ui::print(&format!("Completed task {}", id), None);
    }
    Ok(())
}

/// `yata push`
pub fn push(paths: &Paths) -> Result<()> {
    let config = ConfigManager::load(paths).context("failed to load configuration")?;
    let mut backend = backend_from_config(config, paths).context("failed to push tasks")?;

    let report = backend.push().context("failed to push tasks")?;
    ui::print(&format!("Pushed to {}: {}", backend.name(), report.summary()), None);
    Ok(())
}

/// `yata fetch`
pub fn fetch(paths: &Paths) -> Result<()> {
    let config = ConfigManager::load(paths).context("failed to load configuration")?;
    let mut backend = backend_from_config(config, paths).context("failed to fetch tasks")?;

    backend.fetch().context("failed to fetch tasks")?;
    Ok(())
}

/// `yata config`
pub fn config(paths: &Paths, matches: &ArgMatches) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .ok_or_else(|| anyhow!("a configuration key is required"))?;
    let mut manager = ConfigManager::load(paths).context("failed to load configuration")?;

    match matches.get_one::<String>("value") {
        Some(value) => {
            manager
                .set_key(key, parse_value(key, value))
                .with_context(|| format!("failed to set '{}'", key))?;
            tracing::debug!(key = %key, path = %manager.path().display(), "updated configuration");
        }
        None => match manager.get_key(key)? {
            Some(value) => {
                let text = serde_yaml::to_string(value)?;
                ui::print(text.trim_end(), None);
            }
            None => ui::print(&format!("{} is not set", key), None),
        },
    }
    Ok(())
}

/// `yata completion`
pub fn completion(command: &mut Command, matches: &ArgMatches) {
    if let Some(shell) = matches.get_one::<Shell>("shell").copied() {
        clap_complete::generate(shell, command, "yata", &mut io::stdout());
    }
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    matches
        .get_one::<String>(name)
        .map(|value| value.parse::<T>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn required_id(matches: &ArgMatches) -> Result<u32> {
    matches
        .get_one::<u32>("id")
        .copied()
        .ok_or_else(|| anyhow!("a task ID is required"))
}
