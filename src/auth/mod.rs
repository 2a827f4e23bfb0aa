//! Credentials and the access-token lifecycle.
//!
//! A token is obtained once with `login`, persisted through a [`TokenStore`],
//! and reused by later processes until it expires or the server rejects it.

use serde::Serialize;
use std::fmt;

mod credentials;
pub mod jwt;
mod token;

pub use credentials::{Credentials, Secret, EMAIL_ENV, PASSWORD_ENV};
pub use token::{store_from_settings, FileTokenStore, KeyringTokenStore, TokenStore};

/// Environment variable holding a token that bypasses the token store.
pub const TOKEN_ENV: &str = "DEEPMIRROR_API_TOKEN";

/// Where the token in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Explicit,
    Environment,
    Store,
    Login,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Explicit => "explicit",
            Self::Environment => "environment",
            Self::Store => "store",
            Self::Login => "login",
        };
        f.write_str(s)
    }
}
