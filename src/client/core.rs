use crate::auth::{jwt, Credentials, TokenSource, TokenStore};
use crate::client::builder::DeepMirrorClientBuilder;
use crate::config::Settings;
use crate::error_code::ErrorClass;
use crate::transport::{ApiRequest, HttpTransport};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const NOT_LOGGED_IN: &str =
    "not logged in; run `dm login` or set DM_CLIENT_EMAIL and DM_CLIENT_PASSWORD";

/// Token currently used by this client.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) source: TokenSource,
}

impl Session {
    pub(crate) fn new(token: impl Into<String>, source: TokenSource) -> Self {
        Self {
            token: token.into().trim().to_string(),
            source,
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Client for the deepmirror prediction API.
///
/// Authenticated calls resolve a token on first use (explicit, environment,
/// token store, then login with credentials) and reuse it afterwards.
pub struct DeepMirrorClient {
    pub(crate) settings: Settings,
    pub(crate) transport: HttpTransport,
    pub(crate) store: Arc<dyn TokenStore>,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) session: Mutex<Option<Session>>,
}

impl DeepMirrorClient {
    pub fn builder() -> DeepMirrorClientBuilder {
        DeepMirrorClientBuilder::new()
    }

    /// Client from [`Settings::load`] and the process environment.
    pub fn from_env() -> Result<Self> {
        DeepMirrorClientBuilder::new().build()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Exchange credentials for an access token and persist it.
    pub async fn login(&self, credentials: &Credentials) -> Result<String> {
        let token = self.request_token(credentials).await?;
        self.store.save(&token)?;
        info!(email = %credentials.email, store = %self.store.describe(), "logged in");
        *self.session.lock().await = Some(Session::new(token.clone(), TokenSource::Login));
        Ok(token)
    }

    /// Persist a token obtained elsewhere and use it for subsequent calls.
    pub async fn save_token(&self, token: &str) -> Result<()> {
        self.store.save(token)?;
        *self.session.lock().await = Some(Session::new(token, TokenSource::Store));
        Ok(())
    }

    /// Forget the current token, both in memory and in the token store.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear()?;
        *self.session.lock().await = None;
        info!(store = %self.store.describe(), "logged out");
        Ok(())
    }

    /// A usable access token, logging in with credentials when necessary.
    pub async fn authenticate(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        let mut expired = false;

        if let Some(current) = session.as_ref() {
            if !jwt::is_expired(&current.token) {
                return Ok(current.token.clone());
            }
            debug!(source = %current.source, "token in use has expired");
            expired = true;
        }

        if let Some(token) = self.store.load()? {
            if !jwt::is_expired(&token) {
                debug!(store = %self.store.describe(), "using cached token");
                *session = Some(Session::new(token.clone(), TokenSource::Store));
                return Ok(token);
            }
            debug!(store = %self.store.describe(), "cached token has expired");
            expired = true;
        }

        match &self.credentials {
            Some(credentials) => {
                let token = self.request_token(credentials).await?;
                self.store.save(&token)?;
                info!(email = %credentials.email, "logged in with configured credentials");
                *session = Some(Session::new(token.clone(), TokenSource::Login));
                Ok(token)
            }
            None if expired => Err(Error::authentication(
                "session token has expired; run `dm login` again",
            )),
            None => Err(Error::authentication(NOT_LOGGED_IN)),
        }
    }

    /// The token the next call would start with, and where it came from.
    ///
    /// Same order as [`authenticate`](Self::authenticate) (explicit, environment,
    /// token store) but never logs in and ignores expiry.
    pub async fn current_token(&self) -> Result<Option<(String, TokenSource)>> {
        if let Some(session) = self.session.lock().await.as_ref() {
            return Ok(Some((session.token.clone(), session.source)));
        }
        Ok(self.store.load()?.map(|token| (token, TokenSource::Store)))
    }

    /// Where the token in use came from, `None` before the first authenticated call.
    pub async fn token_source(&self) -> Option<TokenSource> {
        self.session.lock().await.as_ref().map(|s| s.source)
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<String> {
        if credentials.email.trim().is_empty() {
            return Err(Error::validation_with_context(
                "email must not be empty",
                ErrorContext::new().with_field_path("credentials.email"),
            ));
        }
        let request = ApiRequest::post_form(
            "/login",
            vec![
                ("username".to_string(), credentials.email.trim().to_string()),
                (
                    "password".to_string(),
                    credentials.password.expose().to_string(),
                ),
            ],
        );
        let response: LoginResponse = match self.transport.json(&request, None).await {
            Ok(resp) => resp,
            Err(Error::Remote {
                class: ErrorClass::Authentication | ErrorClass::InvalidRequest,
                message,
                ..
            }) => {
                return Err(Error::authentication(format!("login rejected: {}", message)));
            }
            Err(e) => return Err(e),
        };
        let token = response.access_token.trim().to_string();
        if token.is_empty() {
            return Err(Error::authentication("login response contained an empty token"));
        }
        Ok(token)
    }

    /// Authenticated request; on 401 logs in again once when credentials are known.
    pub(crate) async fn call(&self, request: &ApiRequest) -> Result<Bytes> {
        let token = self.authenticate().await?;
        match self.transport.bytes(request, Some(&token)).await {
            Err(err) if err.class() == Some(ErrorClass::Authentication) => {
                let Some(credentials) = &self.credentials else {
                    return Err(Error::authentication(format!(
                        "token rejected by server ({}); run `dm login` again",
                        remote_message(&err)
                    )));
                };
                warn!(path = %request.path, "token rejected, logging in again");
                let token = self.login(credentials).await?;
                match self.transport.bytes(request, Some(&token)).await {
                    Err(err) if err.class() == Some(ErrorClass::Authentication) => {
                        Err(Error::authentication(format!(
                            "token rejected after re-login: {}",
                            remote_message(&err)
                        )))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    pub(crate) async fn call_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let body = self.call(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn remote_message(err: &Error) -> &str {
    match err {
        Error::Remote { message, .. } => message,
        _ => "",
    }
}
