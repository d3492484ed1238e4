//! Integration tests for pushing through the sync backends

mod common;

use chrono::{Duration, Utc};
use common::create_data_dir;
use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::rc::Rc;
use yata::config::ConfigManager;
use yata::error::{SyncError, SyncResult};
use yata::sync::{
    publishable_files, CloudDriveBackend, CodePrompt, Credential, CredentialManager,
    CredentialStore, RemoteConnector, RemoteFile, RemoteStore, SyncBackend, TokenExchange,
    Unconfigured,
};
use yata::task::{Priority, TaskStore};

type Log = Rc<RefCell<Vec<String>>>;

struct RecordingStore {
    stored: Option<Credential>,
    log: Log,
}

impl CredentialStore for RecordingStore {
    fn load_credential(&self) -> Option<Credential> {
        self.stored.clone()
    }

    fn save_credential(&mut self, credential: &Credential) -> yata::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("save {}", credential.access_token));
        self.stored = Some(credential.clone());
        Ok(())
    }
}

struct RecordingExchange {
    log: Log,
}

impl TokenExchange for RecordingExchange {
    fn authorization_url(&self) -> SyncResult<String> {
        Ok("https://auth.example/consent".to_string())
    }

    fn exchange(&self, code: &str) -> SyncResult<Credential> {
        self.log.borrow_mut().push(format!("exchange {}", code));
        Ok(Credential::bearer(
            "fresh-token",
            Some(Utc::now() + Duration::hours(1)),
        ))
    }
}

struct RecordingPrompt {
    log: Log,
}

impl CodePrompt for RecordingPrompt {
    fn obtain_code(&mut self, url: &str) -> io::Result<String> {
        self.log.borrow_mut().push(format!("prompt {}", url));
        Ok("4/abc".to_string())
    }
}

struct RecordingRemote {
    listing: Vec<RemoteFile>,
    log: Log,
}

impl RemoteStore for RecordingRemote {
    fn list(&self) -> SyncResult<Vec<RemoteFile>> {
        self.log.borrow_mut().push("list".to_string());
        Ok(self.listing.clone())
    }

    fn create(&self, name: &str, content: &mut dyn Read) -> SyncResult<()> {
        let mut sink = Vec::new();
        content.read_to_end(&mut sink).unwrap();
        self.log.borrow_mut().push(format!("create {}", name));
        Ok(())
    }

    fn update(&self, remote_id: &str, name: &str, content: &mut dyn Read) -> SyncResult<()> {
        let mut sink = Vec::new();
        content.read_to_end(&mut sink).unwrap();
        self.log
            .borrow_mut()
            .push(format!("update {} {}", name, remote_id));
        Ok(())
    }
}

struct RecordingConnector {
    listing: Vec<RemoteFile>,
    log: Log,
}

impl RemoteConnector for RecordingConnector {
    fn connect(&self, credential: &Credential) -> SyncResult<Box<dyn RemoteStore>> {
        self.log
            .borrow_mut()
            .push(format!("connect {}", credential.access_token));
        Ok(Box::new(RecordingRemote {
            listing: self.listing.clone(),
            log: self.log.clone(),
        }))
    }
}

fn backend(
    stored: Option<Credential>,
    listing: Vec<RemoteFile>,
    paths: &yata::config::Paths,
    log: &Log,
) -> CloudDriveBackend {
    let credentials = CredentialManager::new(
        Box::new(RecordingStore {
            stored,
            log: log.clone(),
        }),
        Box::new(RecordingExchange { log: log.clone() }),
        Box::new(RecordingPrompt { log: log.clone() }),
    );
    CloudDriveBackend::new(
        credentials,
        Box::new(RecordingConnector {
            listing,
            log: log.clone(),
        }),
        publishable_files(paths),
    )
}

fn remote_tasks_file() -> Vec<RemoteFile> {
    vec![RemoteFile {
        name: "tasks.json".to_string(),
        remote_id: "1AbC".to_string(),
    }]
}

#[test]
fn test_push_updates_existing_and_creates_missing() {
    let (_dir, paths) = create_data_dir();
    TaskStore::new(&paths)
        .create("sync me", Vec::<String>::new(), Priority::Normal)
        .unwrap();
    let log: Log = Rc::default();
    let valid = Credential::bearer("stored-token", None);

    let mut backend = backend(Some(valid), remote_tasks_file(), &paths, &log);
    let report = backend.push().unwrap();

    assert_eq!(report.updated, vec!["tasks.json"]);
    assert_eq!(report.created, vec![".yataid"]);
    assert_eq!(
        *log.borrow(),
        vec![
            "connect stored-token",
            "list",
            "update tasks.json 1AbC",
            "create .yataid",
        ]
    );
}

#[test]
fn test_invalid_credential_authorizes_once_and_saves_before_pushing() {
    let (_dir, paths) = create_data_dir();
    TaskStore::new(&paths)
        .create("sync me", Vec::<String>::new(), Priority::Normal)
        .unwrap();
    let log: Log = Rc::default();
    let expired = Credential::bearer("stale", Some(Utc::now() - Duration::days(1)));

    let mut backend = backend(Some(expired), remote_tasks_file(), &paths, &log);
    backend.push().unwrap();

    let log = log.borrow();
    assert_eq!(
        log.iter().filter(|l| l.starts_with("prompt")).count(),
        1
    );
    assert_eq!(
        &log[..4],
        &[
            "prompt https://auth.example/consent",
            "exchange 4/abc",
            "save fresh-token",
            "connect fresh-token",
        ]
    );
}

#[test]
fn test_unreadable_stored_token_leads_to_authorization() {
    let (_dir, paths) = create_data_dir();
    TaskStore::new(&paths)
        .create("sync me", Vec::<String>::new(), Priority::Normal)
        .unwrap();
    fs::write(
        paths.config_file(),
        "backend: googledrive\ngoogledrive:\n  secretfile: secret.json\n  oauthtoken:\n    token_type: Bearer\n",
    )
    .unwrap();
    let log: Log = Rc::default();

    let config = ConfigManager::load(&paths).unwrap();
    assert_eq!(config.load_credential(), None);

    let credentials = CredentialManager::new(
        Box::new(config),
        Box::new(RecordingExchange { log: log.clone() }),
        Box::new(RecordingPrompt { log: log.clone() }),
    );
    let mut backend = CloudDriveBackend::new(
        credentials,
        Box::new(RecordingConnector {
            listing: Vec::new(),
            log: log.clone(),
        }),
        publishable_files(&paths),
    );
    backend.push().unwrap();

    assert_eq!(
        &log.borrow()[..3],
        &[
            "prompt https://auth.example/consent",
            "exchange 4/abc",
            "connect fresh-token",
        ]
    );
    let reloaded = ConfigManager::load(&paths).unwrap();
    assert_eq!(
        reloaded.load_credential().map(|c| c.access_token),
        Some("fresh-token".to_string())
    );
}

#[test]
fn test_push_with_missing_local_file_reports_which_file() {
    let (_dir, paths) = create_data_dir();
    fs::write(paths.tasks_file(), "[]").unwrap();
    let log: Log = Rc::default();

    let mut backend = backend(Some(Credential::bearer("t", None)), Vec::new(), &paths, &log);
    let err = backend.push().unwrap_err();

    assert!(matches!(err, SyncError::Transfer { ref name, .. } if name == ".yataid"));
    assert!(log.borrow().contains(&"create tasks.json".to_string()));
}

#[test]
fn test_fetch_is_a_no_op() {
    let (_dir, paths) = create_data_dir();
    let log: Log = Rc::default();

    let mut backend = backend(None, Vec::new(), &paths, &log);
    backend.fetch().unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_unconfigured_backend_refuses_both_operations() {
    let mut backend = Unconfigured;
    assert!(matches!(backend.push(), Err(SyncError::Configuration(_))));
    assert!(matches!(backend.fetch(), Err(SyncError::Configuration(_))));
}
