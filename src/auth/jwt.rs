//! Expiry inspection for JWT access tokens.
//!
//! Only the payload is decoded; signatures are the server's business.
//! Tokens that are not JWTs are treated as non-expiring.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Tokens expiring within this window are considered already expired.
pub const EXPIRY_SKEW: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct Claims {
    exp: Option<u64>,
}

/// The `exp` claim of a JWT, if the token is one and carries it.
pub fn expires_at(token: &str) -> Option<SystemTime> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp.map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
}

pub fn is_expired_at(token: &str, now: SystemTime) -> bool {
    match expires_at(token) {
        Some(exp) => exp <= now + EXPIRY_SKEW,
        None => false,
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, SystemTime::now())
}

#[cfg(test)]
pub(crate) fn fake_jwt(exp: u64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user","exp":{}}}"#, exp));
    format!("{}.{}.signature", header, payload)
}
