use super::{opt_id_from_string_or_number, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a synchronous property prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub smiles: Vec<String>,
    #[serde(default, alias = "prediction", alias = "results")]
    pub predictions: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionResponse {
    /// Pair each input SMILES with its prediction, in server order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.smiles
            .iter()
            .map(String::as_str)
            .zip(self.predictions.iter())
    }
}

/// Acknowledgement of a queued HLM stability prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlmSubmission {
    #[serde(alias = "id", deserialize_with = "super::id_from_string_or_number")]
    pub task_id: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State, and once completed the results, of an HLM prediction task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlmResult {
    #[serde(default, alias = "id", deserialize_with = "opt_id_from_string_or_number")]
    pub task_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default, alias = "predictions")]
    pub results: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
