//! Model listing, metadata and info

use crate::integration::mock_server::MockApi;

#[tokio::test]
async fn test_list_models_wrapped_response() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_get(
            "/models/",
            "tok",
            200,
            r#"{"models":[{"id":1,"model_name":"logd","is_classification":false},{"id":"herg","model_name":"hERG","is_classification":true}]}"#,
        )
        .create_async()
        .await;

    let models = api.client().list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "1");
    assert_eq!(models[0].name.as_deref(), Some("logd"));
    assert_eq!(models[1].is_classification, Some(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_model_metadata() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_get(
            "/models/metadata/logd",
            "tok",
            200,
            r#"{"id":"logd","name":"logD","metrics":{"r2":0.81},"training_size":4200}"#,
        )
        .create_async()
        .await;

    let meta = api.client().model_metadata("logd").await.unwrap();

    assert_eq!(meta.id.as_deref(), Some("logd"));
    assert_eq!(meta.metrics.unwrap()["r2"], 0.81);
    assert_eq!(meta.extra["training_size"], 4200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_model_info_encodes_id() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_get(
            "/models/my%20model",
            "tok",
            200,
            r#"{"id":"my model","description":"in-house permeability","status":"completed"}"#,
        )
        .create_async()
        .await;

    let info = api.client().model_info("my model").await.unwrap();

    assert_eq!(info.description.as_deref(), Some("in-house permeability"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_model_id_is_rejected_locally() {
    let api = MockApi::new().await;
    api.write_token("tok");
    let err = api.client().model_metadata("  ").await.unwrap_err();
    assert!(matches!(err, deepmirror::Error::Validation { .. }));
}
