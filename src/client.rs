//! The API client and its builder.
//!
//! Operations are grouped by endpoint family: models, inference, training,
//! and structure prediction.

mod builder;
mod core;
mod inference;
mod models;
mod structure;
mod training;

pub use builder::DeepMirrorClientBuilder;
pub use self::core::DeepMirrorClient;
