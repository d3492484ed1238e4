//! Publishing local files to a remote blob store
//!
//! Each local file is matched by name against a fresh listing of the remote
//! space: a match is updated in place, anything else is created. Transfers
//! happen in order and are not rolled back if a later one fails.

use crate::config::{Paths, ID_FILE_NAME, TASKS_FILE_NAME};
use crate::error::{SyncError, SyncResult};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// A file as listed in the remote space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub name: String,
    pub remote_id: String,
}

/// A local file published under a fixed remote name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishableFile {
    pub name: String,
    pub path: PathBuf,
}

impl PublishableFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        PublishableFile {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The files a push publishes: the task data and the identity marker
pub fn publishable_files(paths: &Paths) -> Vec<PublishableFile> {
    vec![
        PublishableFile::new(TASKS_FILE_NAME, paths.tasks_file()),
        PublishableFile::new(ID_FILE_NAME, paths.id_file()),
    ]
}

/// An application-private blob store on the remote side
pub trait RemoteStore {
    /// Every file currently in the space
    fn list(&self) -> SyncResult<Vec<RemoteFile>>;

    /// Upload a new file
    fn create(&self, name: &str, content: &mut dyn Read) -> SyncResult<()>;

    /// Replace the content of an existing file, keeping its remote ID
    fn update(&self, remote_id: &str, name: &str, content: &mut dyn Read) -> SyncResult<()>;
}

/// What a push did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
}

impl PushReport {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.created.is_empty() {
            parts.push(format!("created {}", self.created.join(", ")));
        }
        if !self.updated.is_empty() {
            parts.push(format!("updated {}", self.updated.join(", ")));
        }
        if parts.is_empty() {
            "nothing to push".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Push every local file to the remote, creating or updating by name
pub fn reconcile(remote: &dyn RemoteStore, files: &[PublishableFile]) -> SyncResult<PushReport> {
    let listing = remote.list()?;
    tracing::debug!(remote_files = listing.len(), "listed remote space");

    let mut report = PushReport::default();
    for file in files {
        let mut content = File::open(&file.path).map_err(|source| SyncError::Transfer {
            name: file.name.clone(),
            path: file.path.clone(),
            source,
        })?;

        match listing.iter().find(|r| r.name == file.name) {
            Some(existing) => {
                tracing::info!(name = %file.name, remote_id = %existing.remote_id, "updating remote file");
                remote.update(&existing.remote_id, &file.name, &mut content)?;
                report.updated.push(file.name.clone());
            }
            None => {
                tracing::info!(name = %file.name, "creating remote file");
                remote.create(&file.name, &mut content)?;
                report.created.push(file.name.clone());
            }
        }
    }

    Ok(report)
}
