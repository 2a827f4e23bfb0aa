use crate::auth::{self, Credentials, TokenSource, TokenStore};
use crate::client::core::{DeepMirrorClient, Session};
use crate::config::Settings;
use crate::transport::{HttpTransport, RetryConfig};
use crate::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Builder for [`DeepMirrorClient`].
///
/// Keep this surface area small: settings, where the token lives, and how to
/// obtain a new one.
pub struct DeepMirrorClientBuilder {
    settings: Option<Settings>,
    host: Option<String>,
    token: Option<String>,
    credentials: Option<Credentials>,
    token_store: Option<Arc<dyn TokenStore>>,
    retry: Option<RetryConfig>,
    use_env: bool,
}

impl DeepMirrorClientBuilder {
    pub fn new() -> Self {
        Self {
            settings: None,
            host: None,
            token: None,
            credentials: None,
            token_store: None,
            retry: None,
            use_env: true,
        }
    }

    /// Use these settings instead of [`Settings::load`].
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Override the API host (primarily for testing with mock servers).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Use this access token; the token store is not consulted while it is valid.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Credentials for transparent (re-)login when no usable token exists.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Read `DEEPMIRROR_API_TOKEN`, `DM_CLIENT_EMAIL` and `DM_CLIENT_PASSWORD`
    /// when nothing explicit was given. Enabled by default.
    pub fn use_env(mut self, enable: bool) -> Self {
        self.use_env = enable;
        self
    }

    pub fn build(self) -> Result<DeepMirrorClient> {
        let mut settings = match self.settings {
            Some(settings) => settings,
            None => Settings::load()?,
        };
        if let Some(host) = self.host {
            settings.host = host;
        }
        settings.validate()?;

        let mut transport = HttpTransport::new(&settings)?;
        if let Some(retry) = self.retry {
            transport = transport.with_retry(retry);
        }

        let store = self
            .token_store
            .unwrap_or_else(|| auth::store_from_settings(&settings));

        let session = match self.token {
            Some(token) => Some(Session::new(token, TokenSource::Explicit)),
            None if self.use_env => std::env::var(auth::TOKEN_ENV)
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(|t| Session::new(t, TokenSource::Environment)),
            None => None,
        };

        let credentials = self
            .credentials
            .or_else(|| self.use_env.then(Credentials::from_env).flatten());

        Ok(DeepMirrorClient {
            settings,
            transport,
            store,
            credentials,
            session: Mutex::new(session),
        })
    }
}

impl Default for DeepMirrorClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
