use crate::client::DeepMirrorClient;
use crate::transport::ApiRequest;
use crate::types::structure::TaskList;
use crate::types::{validate_id, StructurePredictionRequest, StructureTask};
use crate::Result;
use bytes::Bytes;
use tracing::info;

impl DeepMirrorClient {
    /// Submit a co-folding job.
    pub async fn structure_predict(
        &self,
        request: &StructurePredictionRequest,
    ) -> Result<StructureTask> {
        request.validate()?;
        let body = serde_json::to_value(request)?;
        let task: StructureTask = self
            .call_json(&ApiRequest::post_json("/cofolding", body))
            .await?;
        info!(task_id = %task.task_id, model = %request.model, chains = request.chains.len(), "structure prediction submitted");
        Ok(task)
    }

    pub async fn list_structure_tasks(&self) -> Result<Vec<StructureTask>> {
        let list: TaskList = self.call_json(&ApiRequest::get("/cofolding")).await?;
        Ok(list.into())
    }

    /// Raw archive (zip) of predicted structures for a finished task.
    pub async fn download_structure_prediction(&self, task_id: &str) -> Result<Bytes> {
        validate_id(task_id, "task_id")?;
        let request = ApiRequest::get("/cofolding")
            .segment(task_id.trim())
            .segment("download");
        self.call(&request).await
    }
}
