use super::{opt_id_from_string_or_number, validate_smiles, TaskStatus};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Training data for a custom model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRequest {
    pub model_name: String,
    pub smiles: Vec<String>,
    pub labels: Vec<f64>,
    pub is_classification: bool,
}

impl TrainRequest {
    pub fn new(model_name: impl Into<String>, smiles: Vec<String>, labels: Vec<f64>) -> Self {
        Self {
            model_name: model_name.into(),
            smiles,
            labels,
            is_classification: false,
        }
    }

    pub fn classification(mut self, enable: bool) -> Self {
        self.is_classification = enable;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(Error::validation_with_context(
                "model name must not be empty",
                ErrorContext::new().with_field_path("train.model_name"),
            ));
        }
        validate_smiles(&self.smiles, "train.smiles")?;
        if self.smiles.len() != self.labels.len() {
            return Err(Error::validation_with_context(
                "every SMILES needs exactly one label",
                ErrorContext::new()
                    .with_field_path("train.labels")
                    .with_details(format!(
                        "{} smiles, {} labels",
                        self.smiles.len(),
                        self.labels.len()
                    )),
            ));
        }
        if let Some(idx) = self.labels.iter().position(|l| !l.is_finite()) {
            return Err(Error::validation_with_context(
                "labels must be finite numbers",
                ErrorContext::new().with_field_path(format!("train.labels[{}]", idx)),
            ));
        }
        if self.is_classification {
            if let Some(idx) = self.labels.iter().position(|l| *l != 0.0 && *l != 1.0) {
                return Err(Error::validation_with_context(
                    "classification labels must be 0 or 1",
                    ErrorContext::new().with_field_path(format!("train.labels[{}]", idx)),
                ));
            }
        }
        Ok(())
    }
}

/// Server acknowledgement of a training job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResponse {
    #[serde(default, alias = "model_id", deserialize_with = "opt_id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
