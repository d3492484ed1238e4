//! Google OAuth and Drive transport
//!
//! Uses `ureq` for synchronous HTTP. Only the Drive `appDataFolder` space
//! is touched, with the `drive.appdata` scope.

use crate::error::{SyncError, SyncResult};
use crate::sync::credential::{Credential, TokenExchange};
use crate::sync::reconcile::{RemoteFile, RemoteStore};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use url::Url;

const DRIVE_APPDATA_SCOPE: &str = "https://www.googleapis.com/auth/drive.appdata";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const APP_DATA_FOLDER: &str = "appDataFolder";
const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const OUT_OF_BAND_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";
const LIST_PAGE_SIZE: &str = "100";
const MULTIPART_BOUNDARY: &str = "yata-multipart-boundary";

/// Build the HTTP agent shared by the OAuth client and Drive calls
pub fn agent(timeout_secs: u64) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
}

/// Flatten a `ureq` failure into a message, keeping the response body
fn describe(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            format!("HTTP {}: {}", code, body.trim())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

/// OAuth client settings from a Google "client secret" JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Parse the JSON the Google console hands out
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json)
            .map_err(|e| SyncError::Configuration(format!("Invalid client secret file: {}", e)))?;

        let secret = file.installed.or(file.web).ok_or_else(|| {
            SyncError::Configuration(
                "Client secret file has neither an \"installed\" nor a \"web\" section".to_string(),
            )
        })?;

        Url::parse(&secret.auth_uri).map_err(|e| {
            SyncError::Configuration(format!("Invalid auth_uri '{}': {}", secret.auth_uri, e))
        })?;

        Ok(secret)
    }

    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            SyncError::Configuration(format!(
                "Unable to read client secret file '{}': {}. Set its location with \
                 `yata config googledrive.secretfile <path>`",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(OUT_OF_BAND_REDIRECT)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Authorization-code flow against Google's OAuth endpoints
pub struct GoogleOAuth {
    secret: ClientSecret,
    agent: ureq::Agent,
}

impl GoogleOAuth {
    pub fn new(secret: ClientSecret, agent: ureq::Agent) -> Self {
        GoogleOAuth { secret, agent }
    }
}

impl TokenExchange for GoogleOAuth {
    fn authorization_url(&self) -> SyncResult<String> {
        let url = Url::parse_with_params(
            &self.secret.auth_uri,
            [
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", self.secret.redirect_uri()),
                ("response_type", "code"),
                ("scope", DRIVE_APPDATA_SCOPE),
                ("state", "state-token"),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| SyncError::Configuration(format!("Invalid auth_uri: {}", e)))?;

        Ok(url.to_string())
    }

    fn exchange(&self, code: &str) -> SyncResult<Credential> {
        tracing::debug!(token_uri = %self.secret.token_uri, "exchanging authorization code");

        let response = self
            .agent
            .post(&self.secret.token_uri)
            .send_form(&[
                ("code", code),
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("redirect_uri", self.secret.redirect_uri()),
                ("grant_type", "authorization_code"),
            ])
            .map_err(|e| SyncError::Credential(format!("token exchange failed: {}", describe(e))))?;

        let token: TokenResponse = response
            .into_json()
            .map_err(|e| SyncError::Credential(format!("unreadable token response: {}", e)))?;

        Ok(Credential {
            access_token: token.access_token,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: token.refresh_token,
            expiry: token.expires_in.and_then(|secs| token_expiry(secs, Utc::now())),
        })
    }
}

/// When a token issued at `now` with a lifetime of `secs` expires; a
/// lifetime chrono cannot represent is treated as no expiry
fn token_expiry(secs: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let expiry = Duration::try_seconds(secs).and_then(|lifetime| now.checked_add_signed(lifetime));
    if expiry.is_none() {
        tracing::warn!(expires_in = secs, "ignoring out of range token lifetime");
    }
    expiry
}

// ---------------------------------------------------------------------------
// Drive
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

/// Drive `appDataFolder` access for one credential
pub struct DriveClient {
    agent: ureq::Agent,
    authorization: String,
}

impl DriveClient {
    pub fn new(agent: ureq::Agent, credential: &Credential) -> Self {
        DriveClient {
            agent,
            authorization: credential.authorization_header(),
        }
    }

    fn list_page(&self, page_token: Option<&str>) -> SyncResult<FileList> {
        let mut request = self
            .agent
            .get(FILES_URL)
            .set("Authorization", &self.authorization)
            .query("spaces", APP_DATA_FOLDER)
            .query("fields", "nextPageToken, files(id, name)")
            .query("pageSize", LIST_PAGE_SIZE);
        if let Some(token) = page_token {
            request = request.query("pageToken", token);
        }

        request
            .call()
            .map_err(|e| SyncError::remote("list", None, describe(e)))?
            .into_json()
            .map_err(|e| SyncError::remote("list", None, e))
    }
}

impl RemoteStore for DriveClient {
    fn list(&self) -> SyncResult<Vec<RemoteFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(page_token.as_deref())?;
            files.extend(page.files.into_iter().map(|f| RemoteFile {
                name: f.name,
                remote_id: f.id,
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(files)
    }

    fn create(&self, name: &str, content: &mut dyn Read) -> SyncResult<()> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [APP_DATA_FOLDER],
        });
        let head = format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{meta}\r\n\
             --{b}\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = MULTIPART_BOUNDARY,
            meta = metadata
        );
        let tail = format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY);
        let body = Cursor::new(head.into_bytes())
            .chain(content)
            .chain(Cursor::new(tail.into_bytes()));

        self.agent
            .post(UPLOAD_URL)
            .query("uploadType", "multipart")
            .set("Authorization", &self.authorization)
            .set(
                "Content-Type",
                &format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .send(body)
            .map_err(|e| SyncError::remote("create", Some(name), describe(e)))?;

        Ok(())
    }

    fn update(&self, remote_id: &str, name: &str, content: &mut dyn Read) -> SyncResult<()> {
        self.agent
            .request("PATCH", &format!("{}/{}", UPLOAD_URL, remote_id))
            .query("uploadType", "media")
            .set("Authorization", &self.authorization)
            .set("Content-Type", "application/octet-stream")
            .send(content)
            .map_err(|e| SyncError::remote("update", Some(name), describe(e)))?;

        Ok(())
    }
}
