//! Persistent task storage
//!
//! Tasks live in `tasks.json` as one JSON array, rewritten wholesale on
//! every mutation. `.yataid` records the last ID handed out so IDs are
//! never reused.

use crate::config::Paths;
use crate::error::{StoreError, StoreResult};
use crate::task::model::{Priority, Task};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The authoritative collection of tasks
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks_path: PathBuf,
    id_path: PathBuf,
}

impl TaskStore {
    /// Open the store that lives in a data directory
    pub fn new(paths: &Paths) -> Self {
        TaskStore {
            tasks_path: paths.tasks_file(),
            id_path: paths.id_file(),
        }
    }

    /// Open a store backed by explicit files
    pub fn with_files(tasks_path: impl Into<PathBuf>, id_path: impl Into<PathBuf>) -> Self {
        TaskStore {
            tasks_path: tasks_path.into(),
            id_path: id_path.into(),
        }
    }

    pub fn tasks_path(&self) -> &Path {
        &self.tasks_path
    }

    pub fn id_path(&self) -> &Path {
        &self.id_path
    }

    /// Read every task, in stored order
    pub fn get_all(&self) -> StoreResult<Vec<Task>> {
        let contents = match fs::read_to_string(&self.tasks_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.tasks_path.display(), "no task file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::storage("read", &self.tasks_path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| StoreError::storage("parse", &self.tasks_path, e))
    }

    /// Look up a single task
    pub fn get(&self, id: u32) -> StoreResult<Task> {
        self.get_all()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Record a new task and persist it
    pub fn create<I, S>(&self, description: &str, tags: I, priority: Priority) -> StoreResult<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let description = description.trim();
        if description.is_empty() {
            return Err(StoreError::EmptyDescription);
        }

        let mut tasks = self.get_all()?;
        let id = self.next_id(&tasks)?;
        let task = Task::new(id, description, tags, priority, Utc::now());

        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        self.write_last_id(id)?;

        tracing::debug!(id, "created task");
        Ok(task)
    }

    /// Mark a task as completed and persist the change
    pub fn complete(&self, id: u32) -> StoreResult<Task> {
        let mut tasks = self.get_all()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        task.completed = true;
        let completed = task.clone();
        self.write_tasks(&tasks)?;

        tracing::debug!(id, "completed task");
        Ok(completed)
    }

    /// Pick an ID above both the recorded marker and every stored task
    fn next_id(&self, tasks: &[Task]) -> StoreResult<u32> {
        let highest = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let last = self.read_last_id()?.max(highest);
        last.checked_add(1)
            .ok_or_else(|| StoreError::storage("allocate an ID in", &self.id_path, "IDs exhausted"))
    }

    fn read_last_id(&self) -> StoreResult<u32> {
        match fs::read_to_string(&self.id_path) {
            Ok(contents) if contents.trim().is_empty() => Ok(0),
            Ok(contents) => contents
                .trim()
                .parse()
                .map_err(|e| StoreError::storage("parse", &self.id_path, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StoreError::storage("read", &self.id_path, e)),
        }
    }

    fn write_last_id(&self, id: u32) -> StoreResult<()> {
        ensure_parent(&self.id_path)?;
        fs::write(&self.id_path, id.to_string())
            .map_err(|e| StoreError::storage("write", &self.id_path, e))
    }

    fn write_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        ensure_parent(&self.tasks_path)?;
        let json = serde_json::to_string_pretty(tasks)
            .map_err(|e| StoreError::storage("serialize", &self.tasks_path, e))?;
        fs::write(&self.tasks_path, json)
            .map_err(|e| StoreError::storage("write", &self.tasks_path, e))
    }
}

fn ensure_parent(path: &Path) -> StoreResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| StoreError::storage("create", dir, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, TaskStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(&Paths::new(temp_dir.path()));
        (temp_dir, store)
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let (_dir, store) = store();
        let first = store.create("one", ["a"], Priority::Low).unwrap();
        let second = store.create("two", Vec::<String>::new(), Priority::High).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get_all().unwrap(), vec![first, second]);
        assert_eq!(fs::read_to_string(store.id_path()).unwrap(), "2");
    }

    #[test]
    fn test_create_rejects_blank_description() {
        let (_dir, store) = store();
        let result = store.create("   ", Vec::<String>::new(), Priority::Normal);
        assert!(matches!(result, Err(StoreError::EmptyDescription)));
        assert!(!store.tasks_path().exists());
    }

    #[test]
    fn test_ids_survive_lost_marker() {
        let (_dir, store) = store();
        store.create("one", Vec::<String>::new(), Priority::Normal).unwrap();
        store.create("two", Vec::<String>::new(), Priority::Normal).unwrap();
        fs::remove_file(store.id_path()).unwrap();

        let third = store.create("three", Vec::<String>::new(), Priority::Normal).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_marker_ahead_of_tasks_is_respected() {
        let (_dir, store) = store();
        fs::write(store.id_path(), "41").unwrap();

        let task = store.create("late", Vec::<String>::new(), Priority::Normal).unwrap();
        assert_eq!(task.id, 42);
    }

    #[test]
    fn test_complete_persists() {
        let (_dir, store) = store();
        let task = store.create("finish", Vec::<String>::new(), Priority::Normal).unwrap();

        let done = store.complete(task.id).unwrap();
        assert!(done.completed);
        assert!(store.get(task.id).unwrap().completed);
    }

    #[test]
    fn test_complete_missing_task() {
        let (_dir, store) = store();
        store.create("only", Vec::<String>::new(), Priority::Normal).unwrap();

        let result = store.complete(9);
        assert!(matches!(result, Err(StoreError::NotFound(9))));
    }

    #[test]
    fn test_corrupt_task_file() {
        let (_dir, store) = store();
        fs::write(store.tasks_path(), "[{\"id\": ").unwrap();

        let result = store.get_all();
        assert!(matches!(result, Err(StoreError::Storage { action: "parse", .. })));
    }

    #[test]
    fn test_store_with_explicit_files() {
        let temp_dir = TempDir::new().unwrap();
        let tasks_path = temp_dir.path().join("nested").join("todo.json");
        let id_path = temp_dir.path().join("nested").join("last-id");
        let store = TaskStore::with_files(&tasks_path, &id_path);

        let task = store.create("elsewhere", ["x"], Priority::High).unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(fs::read_to_string(&id_path).unwrap(), "1");
        assert_eq!(TaskStore::with_files(&tasks_path, &id_path).get(1).unwrap(), task);
    }

    #[test]
    fn test_corrupt_marker_file() {
        let (_dir, store) = store();
        fs::write(store.id_path(), "seven").unwrap();

        let result = store.create("x", Vec::<String>::new(), Priority::Normal);
        assert!(matches!(result, Err(StoreError::Storage { .. })));
    }
}
