//! Request and response payloads of the prediction API.
//!
//! Response types are tolerant: unknown fields are kept in an `extra` map so
//! that newer server versions do not break older clients.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Model listing, metadata, and info |
//! | [`prediction`] | Property prediction and HLM stability tasks |
//! | [`training`] | Custom model training |
//! | [`structure`] | Co-folding structure prediction tasks |
//! | [`task`] | Status of asynchronous server-side tasks |

pub mod model;
pub mod prediction;
pub mod structure;
pub mod task;
pub mod training;

pub use model::{ModelInfo, ModelMetadata, ModelSummary};
pub use prediction::{HlmResult, HlmSubmission, PredictionResponse};
pub use structure::{Chain, StructureModel, StructurePredictionRequest, StructureTask};
pub use task::TaskStatus;
pub use training::{TrainRequest, TrainResponse};

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Deserializer};

/// Identifiers are strings on the client side; the server sometimes sends integers.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}

pub(crate) fn opt_id_from_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "id_from_string_or_number")] String);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|w| w.0))
}

/// Reject empty lists and blank entries before anything is sent.
/// Trimmed copies of caller-supplied SMILES.
pub(crate) fn normalize_smiles(smiles: &[impl AsRef<str>]) -> Vec<String> {
    smiles.iter().map(|s| s.as_ref().trim().to_string()).collect()
}

pub(crate) fn validate_smiles(smiles: &[String], field: &str) -> Result<()> {
    if smiles.is_empty() {
        return Err(Error::validation_with_context(
            "at least one SMILES string is required",
            ErrorContext::new().with_field_path(field),
        ));
    }
    if let Some(idx) = smiles.iter().position(|s| s.trim().is_empty()) {
        return Err(Error::validation_with_context(
            "SMILES strings must not be blank",
            ErrorContext::new().with_field_path(format!("{}[{}]", field, idx)),
        ));
    }
    Ok(())
}

pub(crate) fn validate_id(id: &str, field: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation_with_context(
            format!("{} must not be empty", field),
            ErrorContext::new().with_field_path(field),
        ));
    }
    if id.contains('/') {
        return Err(Error::validation_with_context(
            format!("{} must not contain '/'", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(id.to_string()),
        ));
    }
    Ok(())
}
