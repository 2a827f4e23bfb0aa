use crate::client::DeepMirrorClient;
use crate::transport::ApiRequest;
use crate::types::{
    normalize_smiles, validate_id, validate_smiles, HlmResult, HlmSubmission, PredictionResponse,
};
use crate::{Error, Result};
use std::time::{Duration, Instant};
use tracing::debug;

impl DeepMirrorClient {
    /// Run `model` on a batch of SMILES and return its predictions.
    pub async fn predict(
        &self,
        model: &str,
        smiles: &[impl AsRef<str>],
    ) -> Result<PredictionResponse> {
        validate_id(model, "model")?;
        let smiles = normalize_smiles(smiles);
        validate_smiles(&smiles, "smiles")?;
        debug!(model, count = smiles.len(), "predict");
        let body = serde_json::json!({ "smiles": smiles });
        let request = ApiRequest::post_json("/inference", body).segment(model.trim());
        self.call_json(&request).await
    }

    /// Queue a human liver microsome stability prediction.
    pub async fn predict_hlm(&self, smiles: &[impl AsRef<str>]) -> Result<HlmSubmission> {
        let smiles = normalize_smiles(smiles);
        validate_smiles(&smiles, "smiles")?;
        let body = serde_json::json!({ "smiles": smiles });
        self.call_json(&ApiRequest::post_json("/hlm", body)).await
    }

    pub async fn get_predict_hlm(&self, task_id: &str) -> Result<HlmResult> {
        validate_id(task_id, "task_id")?;
        let request = ApiRequest::get("/hlm").segment(task_id.trim());
        self.call_json(&request).await
    }

    /// Poll an HLM task until it completes or fails.
    ///
    /// A task still pending after `timeout` yields [`Error::TaskTimeout`].
    pub async fn wait_for_hlm(
        &self,
        task_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<HlmResult> {
        let started = Instant::now();
        loop {
            let result = self.get_predict_hlm(task_id).await?;
            if result.status.is_terminal() {
                return Ok(result);
            }
            if started.elapsed() + poll_interval > timeout {
                return Err(Error::TaskTimeout {
                    task_id: task_id.to_string(),
                    status: result.status.to_string(),
                    waited: started.elapsed(),
                });
            }
            debug!(task_id, status = %result.status, "waiting for HLM task");
            tokio::time::sleep(poll_interval).await;
        }
    }
}
