use super::{id_from_string_or_number, opt_id_from_string_or_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry of the model listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, alias = "model_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_classification: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Training provenance and evaluation metrics of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "model_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_classification: Option<bool>,
    #[serde(default)]
    pub metrics: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Descriptive record of a model (owner, task, visibility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "model_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<super::TaskStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The listing endpoint answers either with a bare array or wrapped in `{"models": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ModelList {
    Bare(Vec<ModelSummary>),
    Wrapped { models: Vec<ModelSummary> },
}

impl From<ModelList> for Vec<ModelSummary> {
    fn from(list: ModelList) -> Self {
        match list {
            ModelList::Bare(models) | ModelList::Wrapped { models } => models,
        }
    }
}
