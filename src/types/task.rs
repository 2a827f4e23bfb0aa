use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a server-side job (HLM prediction, training, co-folding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[serde(alias = "queued", alias = "submitted", alias = "PENDING")]
    Pending,
    #[serde(alias = "in_progress", alias = "processing", alias = "RUNNING")]
    Running,
    #[serde(alias = "succeeded", alias = "success", alias = "done", alias = "COMPLETED")]
    Completed,
    #[serde(alias = "error", alias = "failure", alias = "FAILED")]
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
