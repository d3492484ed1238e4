//! The cloud-drive sync backend
//!
//! A push obtains a credential, connects to the remote space with it and
//! reconciles the publishable files against the remote listing.

use crate::config::{ConfigManager, Paths};
use crate::error::SyncResult;
use crate::sync::credential::{Credential, CredentialManager, TerminalPrompt};
use crate::sync::google::{self, ClientSecret, DriveClient, GoogleOAuth};
use crate::sync::reconcile::{publishable_files, reconcile, PublishableFile, PushReport, RemoteStore};
use crate::sync::SyncBackend;

/// Opens a remote store once a credential is available
pub trait RemoteConnector {
    fn connect(&self, credential: &Credential) -> SyncResult<Box<dyn RemoteStore>>;
}

/// Connects to Google Drive's application data folder
pub struct GoogleDriveConnector {
    agent: ureq::Agent,
}

impl GoogleDriveConnector {
    pub fn new(agent: ureq::Agent) -> Self {
        GoogleDriveConnector { agent }
    }
}

impl RemoteConnector for GoogleDriveConnector {
    fn connect(&self, credential: &Credential) -> SyncResult<Box<dyn RemoteStore>> {
        Ok(Box::new(DriveClient::new(self.agent.clone(), credential)))
    }
}

/// Sync backend publishing to a cloud drive
pub struct CloudDriveBackend {
    credentials: CredentialManager,
    connector: Box<dyn RemoteConnector>,
    files: Vec<PublishableFile>,
}

impl CloudDriveBackend {
    pub fn new(
        credentials: CredentialManager,
        connector: Box<dyn RemoteConnector>,
        files: Vec<PublishableFile>,
    ) -> Self {
        CloudDriveBackend {
            credentials,
            connector,
            files,
        }
    }

    /// Wire up the Google Drive backend from the configuration
    pub fn google_drive(config: ConfigManager, paths: &Paths, secret: ClientSecret) -> Self {
        let agent = google::agent(config.config.googledrive.timeout_secs);
        let credentials = CredentialManager::new(
            Box::new(config),
            Box::new(GoogleOAuth::new(secret, agent.clone())),
            Box::new(TerminalPrompt),
        );

        CloudDriveBackend::new(
            credentials,
            Box::new(GoogleDriveConnector::new(agent)),
            publishable_files(paths),
        )
    }
}

impl SyncBackend for CloudDriveBackend {
    fn name(&self) -> &'static str {
        "googledrive"
    }

    fn push(&mut self) -> SyncResult<PushReport> {
        let credential = self.credentials.credential()?;
        let remote = self.connector.connect(&credential)?;
        reconcile(remote.as_ref(), &self.files)
    }

    /// Fetching from the cloud drive is accepted and does nothing; local
    /// tasks stay authoritative.
    fn fetch(&mut self) -> SyncResult<()> {
        tracing::info!("cloud drive fetch leaves local tasks unchanged");
        Ok(())
    }
}
