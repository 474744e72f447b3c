//! OAuth session handling
//!
//! The interactive consent flow is out of scope: this module consumes the
//! artifacts such a flow leaves behind. At startup it reads the stored
//! authorized-user token, refreshes it against the token endpoint when it
//! has expired, and persists the refreshed artifact with owner-only
//! permissions. The result is a [`Session`], the process-wide capability
//! handle, constructed once and read-only thereafter.
//!
//! The credentials descriptor (`credentials.json`) is read-only input and is
//! never modified; its absence is only an error when there is no stored
//! token either.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

/// OAuth scopes the stored token must cover
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// Tokens this close to expiry are treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// Timeout for the token refresh request
const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Authentication and credential errors
///
/// All of these are fatal precondition failures; none are retried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "credentials file not found: {0}. Download the OAuth client descriptor \
         from your API console and place it in the working directory"
    )]
    MissingCredentials(PathBuf),

    #[error(
        "no stored token at {0}. Complete the OAuth consent flow once with \
         this app's credentials to create it"
    )]
    MissingToken(PathBuf),

    #[error("stored token at {0} is expired and has no refresh token; re-run the consent flow")]
    TokenExpired(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("token refresh failed: {0}")]
    Refresh(String),

    #[error("failed to persist token to {path}: {message}")]
    Persist { path: PathBuf, message: String },
}

/// Authorized session handle
///
/// Constructed once at startup and passed by reference to everything that
/// issues backend calls; the core logic never mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Authorization header value for outbound requests
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Stored authorized-user token artifact
///
/// Matches the JSON layout the standard OAuth tooling writes for installed
/// applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// Current access token
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// True when the access token is still usable at `now`
    ///
    /// A token without an expiry timestamp is assumed usable; the backend
    /// will reject it if not.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + chrono::Duration::seconds(EXPIRY_SKEW_SECS) < expiry,
            None => true,
        }
    }
}

/// Response from the token endpoint
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Produce an authorized [`Session`] from the configured artifacts
///
/// Reads the stored token, refreshing and persisting it when expired.
///
/// # Errors
///
/// Returns [`AuthError`] when no usable token can be produced: missing
/// artifacts, unparsable files, an expired token without a refresh token, or
/// a failed refresh.
pub async fn authorize(config: &Config) -> Result<Session, AuthError> {
    authorize_in(Path::new("."), config).await
}

/// [`authorize`] with an explicit base directory
///
/// The configured file names are resolved against `base`; this is the seam
/// tests use to avoid depending on the process working directory.
pub async fn authorize_in(base: &Path, config: &Config) -> Result<Session, AuthError> {
    let credentials_path = base.join(&config.credentials_file);
    let token_path = base.join(&config.token_file);

    if !token_path.is_file() {
        if !credentials_path.is_file() {
            return Err(AuthError::MissingCredentials(credentials_path));
        }
        return Err(AuthError::MissingToken(token_path));
    }

    let token = read_token(&token_path)?;

    if !token.scopes.is_empty() {
        for required in SCOPES {
            if !token.scopes.iter().any(|scope| scope == required) {
                warn!(scope = required, "Stored token does not list the required scope");
            }
        }
    }

    if token.is_fresh(Utc::now()) {
        debug!("Stored access token is still valid");
        return Ok(Session::new(token.token));
    }

    let Some(refresh_token) = token.refresh_token.clone() else {
        return Err(AuthError::TokenExpired(token_path));
    };

    info!("Access token expired, refreshing");
    let refreshed = refresh(&token, &refresh_token).await?;
    persist_token(&token_path, &refreshed)?;

    Ok(Session::new(refreshed.token))
}

fn read_token(path: &Path) -> Result<StoredToken, AuthError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AuthError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AuthError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Exchange the refresh token for a new access token
async fn refresh(token: &StoredToken, refresh_token: &str) -> Result<StoredToken, AuthError> {
    let client = reqwest::Client::builder()
        .connect_timeout(REFRESH_TIMEOUT)
        .timeout(REFRESH_TIMEOUT)
        .use_rustls_tls()
        .build()
        .map_err(|e| AuthError::Refresh(format!("failed to build HTTP client: {e}")))?;

    let params = [
        ("client_id", token.client_id.as_str()),
        ("client_secret", token.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];

    let response = client
        .post(&token.token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthError::Refresh(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Refresh(format!(
            "token endpoint returned {status}"
        )));
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Refresh(format!("unexpected token endpoint response: {e}")))?;

    Ok(StoredToken {
        token: body.access_token,
        expiry: body
            .expires_in
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        refresh_token: Some(refresh_token.to_string()),
        ..token.clone()
    })
}

/// Write the token artifact atomically with owner-only permissions
///
/// The content lands in a temp file in the same directory, gets fsynced,
/// and is renamed over the target. Permissions are restricted before the
/// rename so the token is never world-readable, even briefly.
fn persist_token(path: &Path, token: &StoredToken) -> Result<(), AuthError> {
    let persist_err = |message: String| AuthError::Persist {
        path: path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(token).map_err(|e| persist_err(e.to_string()))?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .map_err(|e| persist_err(e.to_string()))?;

    temp.write_all(json.as_bytes())
        .map_err(|e| persist_err(e.to_string()))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| persist_err(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o600))
            .map_err(|e| persist_err(e.to_string()))?;
    }

    temp.persist(path).map_err(|e| persist_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn sample_token(expiry: Option<DateTime<Utc>>, refresh: Option<&str>) -> StoredToken {
        StoredToken {
            token: "ya29.sample-access-token".to_string(),
            refresh_token: refresh.map(str::to_string),
            token_uri: "https://oauth2.example.com/token".to_string(),
            client_id: "client-id.apps.example.com".to_string(),
            client_secret: "client-secret".to_string(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
            expiry,
        }
    }

    fn write_token(dir: &Path, name: &str, token: &StoredToken) {
        let json = serde_json::to_string_pretty(token).unwrap();
        std::fs::write(dir.join(name), json).unwrap();
    }

    #[test]
    fn stored_token_roundtrips_through_json() {
        let token = sample_token(Some(Utc::now()), Some("1//refresh"));
        let json = serde_json::to_string(&token).unwrap();
        let parsed: StoredToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.token, token.token);
        assert_eq!(parsed.refresh_token, token.refresh_token);
        assert_eq!(parsed.scopes, token.scopes);
    }

    #[test]
    fn authorized_user_file_shape_parses() {
        let raw = r#"{
            "token": "ya29.abc",
            "refresh_token": "1//xyz",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "secret",
            "scopes": ["https://www.googleapis.com/auth/spreadsheets"],
            "expiry": "2030-01-01T00:00:00Z"
        }"#;
        let parsed: StoredToken = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.token, "ya29.abc");
        assert!(parsed.is_fresh(Utc::now()));
    }

    #[test]
    fn freshness_respects_expiry_and_skew() {
        let now = Utc::now();
        assert!(sample_token(None, None).is_fresh(now));
        assert!(sample_token(Some(now + chrono::Duration::hours(1)), None).is_fresh(now));
        assert!(!sample_token(Some(now - chrono::Duration::hours(1)), None).is_fresh(now));
        // Inside the skew window counts as expired.
        assert!(!sample_token(Some(now + chrono::Duration::seconds(30)), None).is_fresh(now));
    }

    #[tokio::test]
    async fn missing_credentials_and_token_reports_credentials_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder().build().unwrap();
        let err = authorize_in(dir.path(), &config).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn missing_token_with_credentials_present_asks_for_consent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("credentials.json"), "{}").unwrap();
        let config = Config::builder().build().unwrap();
        let err = authorize_in(dir.path(), &config).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken(_)));
    }

    #[tokio::test]
    async fn fresh_token_yields_session_without_touching_network() {
        let dir = tempfile::tempdir().unwrap();
        let token = sample_token(Some(Utc::now() + chrono::Duration::hours(1)), None);
        write_token(dir.path(), "token.json", &token);

        let config = Config::builder().build().unwrap();
        let session = authorize_in(dir.path(), &config).await.unwrap();
        assert_eq!(session.bearer(), "Bearer ya29.sample-access-token");
    }

    #[tokio::test]
    async fn expired_token_without_refresh_token_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let token = sample_token(Some(Utc::now() - chrono::Duration::hours(1)), None);
        write_token(dir.path(), "token.json", &token);

        let config = Config::builder().build().unwrap();
        let err = authorize_in(dir.path(), &config).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired(_)));
    }

    #[tokio::test]
    async fn unparsable_token_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token.json"), "not json").unwrap();

        let config = Config::builder().build().unwrap();
        let err = authorize_in(dir.path(), &config).await.unwrap_err();
        assert!(matches!(err, AuthError::Parse { .. }));
    }

    #[test]
    fn persisted_token_is_owner_only_on_unix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let token = sample_token(Some(Utc::now()), Some("1//refresh"));

        persist_token(&path, &token).unwrap();

        let written = read_token(&path).unwrap();
        assert_eq!(written.token, token.token);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn persist_overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "stale").unwrap();

        let token = sample_token(None, None);
        persist_token(&path, &token).unwrap();
        assert_eq!(read_token(&path).unwrap().token, token.token);
    }
}
