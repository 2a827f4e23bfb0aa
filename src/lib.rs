//! # deepmirror
//!
//! Client library and command-line tool for the deepmirror prediction API:
//! molecular property prediction, custom model training, HLM stability
//! tasks, and protein/ligand co-folding.
//!
//! All computation happens on the service. This crate owns the local parts:
//! logging in, caching the session token between invocations, building
//! requests, and parsing responses into typed values.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepmirror::{Credentials, DeepMirrorClient};
//!
//! #[tokio::main]
//! async fn main() -> deepmirror::Result<()> {
//!     let client = DeepMirrorClient::from_env()?;
//!
//!     // Only needed once; the token is cached in ~/.config/deepmirror/token.
//!     client
//!         .login(&Credentials::new("me@example.com", "password"))
//!         .await?;
//!
//!     let prediction = client.predict("logd", &["CCO", "c1ccccc1"]).await?;
//!     for (smiles, value) in prediction.rows() {
//!         println!("{smiles}\t{value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Credentials, token stores, JWT expiry |
//! | [`client`] | [`DeepMirrorClient`] and its builder |
//! | [`config`] | Layered settings (defaults, YAML file, environment) |
//! | [`transport`] | HTTP requests, retries, error mapping |
//! | [`types`] | Request and response payloads |
//! | [`error_code`] | Classification of remote failures |

pub mod auth;
pub mod client;
pub mod config;
pub mod error_code;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use auth::{Credentials, Secret, TokenSource, TokenStore};
pub use client::{DeepMirrorClient, DeepMirrorClientBuilder};
pub use config::Settings;
pub use types::{
    Chain, ModelInfo, ModelMetadata, ModelSummary, PredictionResponse, StructureModel,
    StructurePredictionRequest, StructureTask, TaskStatus, TrainRequest, TrainResponse,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
