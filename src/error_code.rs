//! Error classes for responses returned by the prediction API.
//!
//! Every non-2xx response is mapped to an [`ErrorClass`]. The class decides
//! whether the transport retries the request and which hint the CLI shows.
//!
//! ## Example
//!
//! ```rust
//! use deepmirror::error_code::ErrorClass;
//!
//! let class = ErrorClass::from_http_status(429);
//! assert_eq!(class.name(), "rate_limited");
//! assert!(class.retryable());
//! ```

use std::fmt;

/// Canonical classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed request, invalid SMILES, or failed payload validation (400/422)
    InvalidRequest,
    /// Missing, invalid, or expired access token (401)
    Authentication,
    /// Token is valid but the account may not use this resource (403)
    PermissionDenied,
    /// Unknown model, task, or endpoint (404)
    NotFound,
    /// Payload exceeds the service limit (413)
    RequestTooLarge,
    /// Request timed out upstream (408/504)
    Timeout,
    /// State conflict, e.g. a task that is not finished yet (409)
    Conflict,
    /// Request rate limit exceeded (429)
    RateLimited,
    /// Service temporarily unavailable (503)
    Overloaded,
    /// Any other 5xx
    ServerError,
    /// Could not be classified
    Unknown,
}

impl ErrorClass {
    /// Returns the standard name (e.g., `"invalid_request"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RequestTooLarge => "request_too_large",
            Self::Timeout => "timeout",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate_limited",
            Self::Overloaded => "overloaded",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }

    /// Returns whether a request failing with this class may be sent again as-is.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout
        )
    }

    /// Maps an HTTP status code to its class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited,
            503 => Self::Overloaded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
