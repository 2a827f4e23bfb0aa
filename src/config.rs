//! Client settings
//!
//! Settings are layered: built-in defaults, then an optional YAML file
//! (`$DEEPMIRROR_CONFIG` or `~/.config/deepmirror/config.yaml`), then
//! environment variables.
//!
//! ```yaml
//! host: https://api.app.deepmirror.ai
//! token_store: keyring
//! timeout_secs: 120
//! ```

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_HOST: &str = "https://api.app.deepmirror.ai";

/// Path prefix of the public API on every host.
pub const API_PREFIX: &str = "/api/v3/public";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Where the session token is persisted between CLI invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStoreKind {
    #[default]
    File,
    Keyring,
}

impl std::str::FromStr for TokenStoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            other => Err(Error::configuration_with_context(
                format!("unknown token store '{}'", other),
                ErrorContext::new()
                    .with_field_path("settings.token_store")
                    .with_details("expected 'file' or 'keyring'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme and authority of the API, e.g. `https://api.app.deepmirror.ai`.
    pub host: String,
    pub token_file: PathBuf,
    pub token_store: TokenStoreKind,
    pub timeout_secs: u64,
    /// Extra attempts for retryable failures; 0 disables retries.
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token_file: config_dir().join("token"),
            token_store: TokenStoreKind::File,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the config file when present, then with the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with environment variables resolved through `lookup`.
    ///
    /// The default config file is optional; a file named by `DEEPMIRROR_CONFIG`
    /// must exist.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup("DEEPMIRROR_CONFIG") {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(Error::configuration_with_context(
                        "config file named by DEEPMIRROR_CONFIG does not exist",
                        ErrorContext::new()
                            .with_source("settings")
                            .with_details(path.display().to_string()),
                    ));
                }
                Self::from_yaml_file(&path)?
            }
            None => {
                let path = config_dir().join("config.yaml");
                if path.is_file() {
                    Self::from_yaml_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        let settings = base.apply_env(lookup)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config file: {}", e),
                ErrorContext::new()
                    .with_source("settings")
                    .with_details(path.display().to_string()),
            )
        })
    }

    /// Overlay `DEEPMIRROR_*` variables resolved through `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DEEPMIRROR_HOST") {
            self.host = host;
        }
        if let Some(path) = lookup("DEEPMIRROR_TOKEN_FILE") {
            self.token_file = PathBuf::from(path);
        }
        if let Some(kind) = lookup("DEEPMIRROR_TOKEN_STORE") {
            self.token_store = kind.parse()?;
        }
        if let Some(secs) = lookup("DEEPMIRROR_TIMEOUT_SECS") {
            self.timeout_secs = parse_number(&secs, "DEEPMIRROR_TIMEOUT_SECS")?;
        }
        if let Some(retries) = lookup("DEEPMIRROR_MAX_RETRIES") {
            self.max_retries = parse_number(&retries, "DEEPMIRROR_MAX_RETRIES")?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.api_base()?;
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new().with_field_path("settings.timeout_secs"),
            ));
        }
        Ok(())
    }

    /// Base URL every endpoint path is appended to, without a trailing slash.
    pub fn api_base(&self) -> Result<String> {
        let url = Url::parse(self.host.trim()).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid host URL: {}", e),
                ErrorContext::new()
                    .with_field_path("settings.host")
                    .with_details(self.host.clone()),
            )
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::configuration_with_context(
                format!("unsupported URL scheme '{}'", url.scheme()),
                ErrorContext::new().with_field_path("settings.host"),
            ));
        }
        Ok(format!(
            "{}{}",
            url.as_str().trim_end_matches('/'),
            API_PREFIX
        ))
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        Error::configuration_with_context(
            format!("{} must be a non-negative integer", key),
            ErrorContext::new().with_details(raw.to_string()),
        )
    })
}

/// `~/.config/deepmirror`, falling back to the working directory without a home.
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_owned());
    PathBuf::from(home).join(".config").join("deepmirror")
}
