//! Session token persistence.

use crate::config::{Settings, TokenStoreKind};
use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const KEYRING_SERVICE: &str = "deepmirror";
const KEYRING_ACCOUNT: &str = "access-token";

/// Storage for the access token shared by every CLI invocation.
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when no token has been saved.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    /// Removing a token that does not exist succeeds.
    fn clear(&self) -> Result<()>;

    /// Human-readable location, used in log and CLI messages.
    fn describe(&self) -> String;
}

/// Build the store selected by `settings.token_store`.
pub fn store_from_settings(settings: &Settings) -> Arc<dyn TokenStore> {
    match settings.token_store {
        TokenStoreKind::File => Arc::new(FileTokenStore::new(settings.token_file.clone())),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::default()),
    }
}

/// Plain-text token file, readable only by the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> Error {
        Error::token_store_with_context(
            format!("failed to {} token file: {}", action, e),
            ErrorContext::new()
                .with_source("file_token_store")
                .with_details(self.path.display().to_string()),
        )
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error("read", e)),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::validation("refusing to save an empty token"));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
            }
        }
        std::fs::write(&self.path, token).map_err(|e| self.io_error("write", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error("restrict permissions of", e))?;
        }
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Token kept in the operating system keyring.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).map_err(|e| self.keyring_error(e))
    }

    fn keyring_error(&self, e: keyring::Error) -> Error {
        Error::token_store_with_context(
            format!("keyring error: {}", e),
            ErrorContext::new()
                .with_source("keyring_token_store")
                .with_details(self.describe()),
        )
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(token.trim().to_string())),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(self.keyring_error(e)),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::validation("refusing to save an empty token"));
        }
        self.entry()?
            .set_password(token)
            .map_err(|e| self.keyring_error(e))?;
        debug!(service = %self.service, "token saved to keyring");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(self.keyring_error(e)),
        }
    }

    fn describe(&self) -> String {
        format!("keyring:{}/{}", self.service, self.account)
    }
}
