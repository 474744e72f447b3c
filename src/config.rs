//! Configuration management for sheetcal
//!
//! Provides hierarchical configuration with discovery and precedence:
//! CLI > config file > built-in defaults. The config file is discovered by
//! searching upward from the current directory for `.sheetcal/config.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default credentials descriptor file name
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Default token artifact file name
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Default Sheets API endpoint
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Directory searched for the config file
const CONFIG_DIR: &str = ".sheetcal";

/// Config file name inside [`CONFIG_DIR`]
const CONFIG_FILE: &str = "config.toml";

/// Configuration errors
///
/// All of these are precondition failures: they are reported once and never
/// retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("credentials file must be a bare file name in the working directory, got: {0}")]
    CredentialsPath(String),

    #[error("token file must be a bare file name in the working directory, got: {0}")]
    TokenPath(String),
}

/// `[auth]` section of config.toml
#[derive(Debug, Clone, Default, Deserialize)]
struct AuthSection {
    credentials_file: Option<String>,
    token_file: Option<String>,
}

/// `[sheets]` section of config.toml
#[derive(Debug, Clone, Default, Deserialize)]
struct SheetsSection {
    base_url: Option<String>,
}

/// On-disk config file shape
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    auth: AuthSection,
    #[serde(default)]
    sheets: SheetsSection,
}

/// CLI-supplied overrides, highest precedence
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file path (disables discovery)
    pub config: Option<PathBuf>,
    pub credentials_file: Option<String>,
    pub token_file: Option<String>,
    pub base_url: Option<String>,
}

/// Resolved configuration for a sheetcal run
///
/// Use [`Config::discover`] for CLI-like behavior or [`Config::builder`] for
/// programmatic construction with deterministic values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials descriptor file name (read-only input, never modified)
    pub credentials_file: String,
    /// Token artifact file name (read at startup, rewritten on refresh)
    pub token_file: String,
    /// Base URL of the Sheets API endpoint
    pub base_url: String,
}

impl Config {
    /// Discover configuration with precedence CLI > file > defaults
    ///
    /// When `cli.config` is set, that file is loaded and a read or parse
    /// failure is an error. Otherwise `.sheetcal/config.toml` is searched
    /// upward from the current directory, and absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unreadable or unparsable config files and
    /// for credential/token values that are not bare file names.
    pub fn discover(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Some(load_file(path)?),
            None => match discover_config_file() {
                Some(path) => Some(load_file(&path)?),
                None => None,
            },
        };
        let file = file.unwrap_or_default();

        let config = Self {
            credentials_file: cli
                .credentials_file
                .clone()
                .or(file.auth.credentials_file)
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
            token_file: cli
                .token_file
                .clone()
                .or(file.auth.token_file)
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string()),
            base_url: cli
                .base_url
                .clone()
                .or(file.sheets.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a builder for programmatic configuration
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check invariants that hold for every constructed `Config`
    fn validate(&self) -> Result<(), ConfigError> {
        if !is_bare_file_name(&self.credentials_file) {
            return Err(ConfigError::CredentialsPath(self.credentials_file.clone()));
        }
        if !is_bare_file_name(&self.token_file) {
            return Err(ConfigError::TokenPath(self.token_file.clone()));
        }
        Ok(())
    }
}

/// Builder for programmatic configuration
///
/// Unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    credentials_file: Option<String>,
    token_file: Option<String>,
    base_url: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn credentials_file(mut self, name: impl Into<String>) -> Self {
        self.credentials_file = Some(name.into());
        self
    }

    #[must_use]
    pub fn token_file(mut self, name: impl Into<String>) -> Self {
        self.token_file = Some(name.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the credential or token file is not a bare
    /// file name.
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = Config {
            credentials_file: self
                .credentials_file
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
            token_file: self
                .token_file
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string()),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}

/// True when `name` is a single path component naming a file
///
/// Rejects separators, parent-dir components, and anything else that would
/// let a configured value escape the working directory.
fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .file_name()
            .is_some_and(|f| f == std::ffi::OsStr::new(name))
}

/// Search upward from the current directory for `.sheetcal/config.toml`
fn discover_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
