use crate::config::Settings;
use crate::error_code::ErrorClass;
use crate::transport::{RetryConfig, TransportError};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use reqwest::{Method, Proxy, Response};
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

const USER_AGENT: &str = concat!("deepmirror-rust/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A single call against the API, relative to the `/api/v3/public` base.
///
/// `path` holds the fixed route; caller-supplied ids go into `segments`
/// and are percent-encoded when the URL is built.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub segments: Vec<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, RequestBody::Empty)
    }

    pub fn post_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path, RequestBody::Json(body))
    }

    pub fn post_form(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::new(Method::POST, path, RequestBody::Form(fields))
    }

    /// Append one path segment after `path`.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = settings.api_base()?;
        let base_url = Url::parse(&base).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid API base URL: {}", e),
                ErrorContext::new().with_details(base.clone()),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "API host cannot carry a path",
                ErrorContext::new().with_details(base),
            ));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy) = env::var("DEEPMIRROR_PROXY_URL").ok().and_then(|u| proxy_from(&u)) {
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url,
            retry: RetryConfig::with_max_retries(settings.max_retries),
        })
    }

    /// Replace the retry policy (tests use short delays).
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Full URL of `request`: base, route, then the encoded segments.
    pub fn url(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(request.path.trim_start_matches('/').split('/'))
                .extend(&request.segments);
        }
        url
    }

    /// Send with retries; any non-2xx response becomes [`Error::Remote`].
    pub async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response> {
        let url = self.url(request);
        let request_id = Uuid::new_v4().to_string();
        let mut attempt = 0u32;
        loop {
            debug!(method = %request.method, %url, %request_id, attempt, "sending request");
            let err = match self.send_once(&url, request, token, &request_id).await {
                Ok(resp) => return Ok(resp),
                Err(err) => err,
            };
            match self.retry.should_retry(attempt, &err) {
                Some(delay) => {
                    warn!(
                        %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(err),
            }
        }
    }

    async fn send_once(
        &self,
        url: &Url,
        request: &ApiRequest,
        token: Option<&str>,
        request_id: &str,
    ) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header("x-request-id", request_id);

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await.map_err(TransportError::Http)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(remote_error(response).await)
        }
    }

    pub async fn json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<T> {
        let body = self.bytes(request, token).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn bytes(&self, request: &ApiRequest, token: Option<&str>) -> Result<Bytes> {
        let response = self.send(request, token).await?;
        let body = response.bytes().await.map_err(TransportError::Http)?;
        Ok(body)
    }
}

/// Proxy for every scheme, or `None` (with a warning) when `url` is unusable.
fn proxy_from(url: &str) -> Option<Proxy> {
    match Proxy::all(url) {
        Ok(proxy) => Some(proxy),
        Err(e) => {
            warn!(proxy = %url, error = %e, "ignoring invalid DEEPMIRROR_PROXY_URL");
            None
        }
    }
}

async fn remote_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let retry_after_ms = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000));
    let body = response.text().await.unwrap_or_default();
    Error::Remote {
        status,
        class: ErrorClass::from_http_status(status),
        message: error_message(&body),
        retry_after_ms,
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"detail": "..."}`, validation lists
/// (`{"detail": [{"msg": ...}]}`), `{"message": ...}` and `{"error": {"message": ...}}`.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        match json.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
        if let Some(s) = json.get("message").and_then(|v| v.as_str()) {
            return s.to_string();
        }
        if let Some(s) = json.pointer("/error/message").and_then(|v| v.as_str()) {
            return s.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
