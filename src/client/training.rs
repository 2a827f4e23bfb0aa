use crate::client::DeepMirrorClient;
use crate::transport::ApiRequest;
use crate::types::{normalize_smiles, TrainRequest, TrainResponse};
use crate::Result;
use tracing::info;

impl DeepMirrorClient {
    /// Start training a custom model on labelled SMILES.
    pub async fn train(&self, request: &TrainRequest) -> Result<TrainResponse> {
        let request = TrainRequest {
            smiles: normalize_smiles(&request.smiles),
            ..request.clone()
        };
        request.validate()?;
        let body = serde_json::to_value(&request)?;
        let response: TrainResponse = self.call_json(&ApiRequest::post_json("/train", body)).await?;
        info!(
            model_name = %request.model_name,
            samples = request.smiles.len(),
            id = response.id.as_deref().unwrap_or("-"),
            "training submitted"
        );
        Ok(response)
    }
}
