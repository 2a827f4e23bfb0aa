//! Co-folding submission, listing and download

use crate::integration::mock_server::{MockApi, API};
use deepmirror::{Chain, StructureModel, StructurePredictionRequest, TaskStatus};
use serde_json::json;

#[tokio::test]
async fn test_structure_predict_submits_chains() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_post_json(
            "/cofolding",
            "tok",
            json!({
                "model": "boltz2",
                "chains": [
                    {"type": "protein", "sequence": "MKTAYIAKQR"},
                    {"type": "ligand", "smiles": "CC(=O)Oc1ccccc1C(=O)O"}
                ],
                "use_msa_server": true,
                "name": "aspirin-complex"
            }),
            r#"{"id": "cf-77", "status": "submitted", "model": "boltz2"}"#,
        )
        .create_async()
        .await;

    let request = StructurePredictionRequest::new(StructureModel::Boltz2)
        .chain(Chain::protein("MKTAY IAKQR"))
        .chain(Chain::ligand("CC(=O)Oc1ccccc1C(=O)O"))
        .use_msa_server(true)
        .name("aspirin-complex");
    let task = api.client().structure_predict(&request).await.unwrap();

    assert_eq!(task.task_id, "cf-77");
    assert_eq!(task.status, TaskStatus::Pending);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_structure_tasks() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_get(
            "/cofolding",
            "tok",
            200,
            r#"[{"task_id":"a","status":"completed","created_at":"2026-01-02T10:00:00Z"},{"task_id":"b","status":"running"}]"#,
        )
        .create_async()
        .await;

    let tasks = api.client().list_structure_tasks().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].status.is_terminal());
    assert_eq!(tasks[1].status, TaskStatus::Running);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let archive: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff];
    let mock = api
        .server
        .mock("GET", format!("{API}/cofolding/a/download").as_str())
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(archive.clone())
        .create_async()
        .await;

    let bytes = api.client().download_structure_prediction("a").await.unwrap();

    assert_eq!(bytes.as_ref(), archive.as_slice());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_structure_request_without_chains_is_rejected() {
    let api = MockApi::new().await;
    api.write_token("tok");
    let request = StructurePredictionRequest::new(StructureModel::Chai1);
    let err = api.client().structure_predict(&request).await.unwrap_err();
    assert!(err.to_string().contains("at least one chain"));
}
