//! HTTP plumbing between the client and the API.

mod http;
pub mod retry;

pub use http::{ApiRequest, HttpTransport, RequestBody};
pub use retry::RetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Connection failures and timeouts, worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout() || e.is_connect(),
            TransportError::Other(_) => false,
        }
    }
}
