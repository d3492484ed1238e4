//! Remote sync
//!
//! A [`SyncBackend`] knows how to push the task store to, and fetch it
//! from, a remote target. The backend is picked from the configuration
//! when a sync command starts.

pub mod credential;
pub mod drive;
pub mod google;
pub mod reconcile;
pub mod unconfigured;

// Re-export main types
pub use credential::*;
pub use drive::*;
pub use reconcile::*;
pub use unconfigured::*;

use crate::config::{BackendKind, ConfigManager, Paths};
use crate::error::{SyncError, SyncResult};
use crate::sync::google::ClientSecret;

/// The two operations every remote target supports
pub trait SyncBackend {
    /// Short name used in messages
    fn name(&self) -> &'static str;

    /// Publish the local task files
    fn push(&mut self) -> SyncResult<PushReport>;

    /// Bring remote changes back
    fn fetch(&mut self) -> SyncResult<()>;
}

/// Build the backend selected by `backend` in the configuration
pub fn backend_from_config(config: ConfigManager, paths: &Paths) -> SyncResult<Box<dyn SyncBackend>> {
    match config.config.backend {
        BackendKind::None => Ok(Box::new(Unconfigured)),
        BackendKind::GoogleDrive => {
            let secret_file = config.config.googledrive.secretfile.clone().ok_or_else(|| {
                SyncError::Configuration(
                    "Google Drive needs an OAuth client secret file. \
                     Set it with `yata config googledrive.secretfile <path>`"
                        .to_string(),
                )
            })?;
            let secret = ClientSecret::from_file(&paths.resolve(&secret_file))?;
            tracing::debug!(secret_file = %secret_file, "using Google Drive backend");

            Ok(Box::new(CloudDriveBackend::google_drive(config, paths, secret)))
        }
    }
}
