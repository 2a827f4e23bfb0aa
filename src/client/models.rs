use crate::client::DeepMirrorClient;
use crate::transport::ApiRequest;
use crate::types::model::ModelList;
use crate::types::{validate_id, ModelInfo, ModelMetadata, ModelSummary};
use crate::Result;

impl DeepMirrorClient {
    /// Models visible to the logged-in account, public and custom.
    pub async fn list_models(&self) -> Result<Vec<ModelSummary>> {
        let list: ModelList = self.call_json(&ApiRequest::get("/models/")).await?;
        Ok(list.into())
    }

    pub async fn model_metadata(&self, model_id: &str) -> Result<ModelMetadata> {
        validate_id(model_id, "model_id")?;
        let request = ApiRequest::get("/models/metadata").segment(model_id.trim());
        self.call_json(&request).await
    }

    pub async fn model_info(&self, model_id: &str) -> Result<ModelInfo> {
        validate_id(model_id, "model_id")?;
        let request = ApiRequest::get("/models").segment(model_id.trim());
        self.call_json(&request).await
    }
}
