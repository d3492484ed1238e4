//! Access credentials and the authorization flow
//!
//! [`CredentialManager`] hands out a usable credential for a sync session.
//! A valid stored credential is used as is; otherwise the user is sent
//! through the provider's authorization page, the code they paste back is
//! exchanged for a new credential, and that credential is persisted before
//! it is returned.

use crate::error::{Result, SyncError, SyncResult};
use crate::ui;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use std::process::{Command, Stdio};

/// Credentials expiring within this window are treated as expired
const EXPIRY_SKEW_SECS: i64 = 10;

/// An OAuth access token and its validity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token stops working; `None` means it does not expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Credential {
    pub fn bearer(access_token: impl Into<String>, expiry: Option<DateTime<Utc>>) -> Self {
        Credential {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry
                .checked_sub_signed(Duration::seconds(EXPIRY_SKEW_SECS))
                .is_some_and(|cutoff| cutoff > now),
            None => true,
        }
    }

    /// Value for an HTTP `Authorization` header
    pub fn authorization_header(&self) -> String {
        let token_type = if self.token_type.is_empty() {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", token_type, self.access_token)
    }
}

/// Where a credential is kept between runs
pub trait CredentialStore {
    fn load_credential(&self) -> Option<Credential>;
    fn save_credential(&mut self, credential: &Credential) -> Result<()>;
}

/// The provider side of the authorization-code flow
pub trait TokenExchange {
    /// Page the user visits to grant access
    fn authorization_url(&self) -> SyncResult<String>;

    /// Trade an authorization code for a credential
    fn exchange(&self, code: &str) -> SyncResult<Credential>;
}

/// Gets an authorization code from the user
pub trait CodePrompt {
    fn obtain_code(&mut self, authorization_url: &str) -> io::Result<String>;
}

/// Obtains, validates and persists the credential for one backend
pub struct CredentialManager {
    store: Box<dyn CredentialStore>,
    exchange: Box<dyn TokenExchange>,
    prompt: Box<dyn CodePrompt>,
}

impl CredentialManager {
    pub fn new(
        store: Box<dyn CredentialStore>,
        exchange: Box<dyn TokenExchange>,
        prompt: Box<dyn CodePrompt>,
    ) -> Self {
        CredentialManager {
            store,
            exchange,
            prompt,
        }
    }

    /// A credential ready for use, authorizing interactively if needed
    pub fn credential(&mut self) -> SyncResult<Credential> {
        match self.store.load_credential() {
            Some(stored) if stored.is_valid() => {
                tracing::debug!("using stored credential");
                return Ok(stored);
            }
            Some(_) => tracing::info!("stored credential is no longer valid"),
            None => tracing::info!("no stored credential"),
        }

        let credential = self.authorize()?;
        self.store
            .save_credential(&credential)
            .map_err(|e| SyncError::Credential(format!("unable to save credential: {}", e)))?;
        tracing::debug!("saved new credential");

        Ok(credential)
    }

    fn authorize(&mut self) -> SyncResult<Credential> {
        let url = self.exchange.authorization_url()?;
        let code = self
            .prompt
            .obtain_code(&url)
            .map_err(|e| SyncError::Credential(format!("unable to read authorization code: {}", e)))?;

        let code = code.trim();
        if code.is_empty() {
            return Err(SyncError::Credential(
                "no authorization code was entered".to_string(),
            ));
        }

        let credential = self.exchange.exchange(code)?;
        if !credential.is_valid() {
            return Err(SyncError::Credential(
                "the provider returned an unusable credential".to_string(),
            ));
        }

        Ok(credential)
    }
}

/// Opens the authorization page and reads the code from standard input
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CodePrompt for TerminalPrompt {
    fn obtain_code(&mut self, authorization_url: &str) -> io::Result<String> {
        if let Err(e) = open_in_browser(authorization_url) {
            tracing::debug!(error = %e, "could not open a browser");
        }

        ui::print(
            &format!(
                "Go to the following link in your browser then type the authorization code:\n{}",
                authorization_url
            ),
            None,
        );

        let mut code = String::new();
        io::stdin().lock().read_line(&mut code)?;
        Ok(code.trim().to_string())
    }
}

/// Hand a URL to the platform's default opener
fn open_in_browser(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };

    let status = command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("opener exited with {:?}", status.code()),
        ))
    }
}
