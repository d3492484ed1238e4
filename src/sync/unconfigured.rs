//! The backend used when no sync target is configured

use crate::error::{SyncError, SyncResult};
use crate::sync::{PushReport, SyncBackend};

/// Refuses every operation with a hint on how to configure a backend
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

impl Unconfigured {
    fn refuse(verb: &str, preposition: &str) -> SyncError {
        SyncError::Configuration(format!(
            "I would love to {} your tasks {} a server, but no sync backend is configured yet! \
             Set one with `yata config backend googledrive`",
            verb, preposition
        ))
    }
}

impl SyncBackend for Unconfigured {
    fn name(&self) -> &'static str {
        "none"
    }

    fn push(&mut self) -> SyncResult<PushReport> {
        Err(Self::refuse("push", "to"))
    }

    fn fetch(&mut self) -> SyncResult<()> {
        Err(Self::refuse("fetch", "from"))
    }
}
