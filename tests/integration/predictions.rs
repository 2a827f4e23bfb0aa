//! Property prediction, HLM tasks and training

use crate::integration::mock_server::{MockApi, API};
use deepmirror::{Error, TaskStatus, TrainRequest};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_predict_sends_smiles_batch() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_post_json(
            "/inference/logd",
            "tok",
            json!({"smiles": ["CCO", "c1ccccc1"]}),
            r#"{"smiles":["CCO","c1ccccc1"],"prediction":[-0.31,2.13]}"#,
        )
        .create_async()
        .await;

    let result = api
        .client()
        .predict("logd", &[" CCO ", "c1ccccc1"])
        .await
        .unwrap();

    let rows: Vec<_> = result.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "CCO");
    assert_eq!(rows[1].1, &json!(2.13));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_input_never_reaches_server() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = api.client();

    let empty: [&str; 0] = [];
    assert!(matches!(
        client.predict("logd", &empty).await,
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        client.predict("logd", &["CCO", ""]).await,
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        client
            .train(&TrainRequest::new("m", vec!["CCO".into()], vec![1.0, 2.0]))
            .await,
        Err(Error::Validation { .. })
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_train_posts_request() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_post_json(
            "/train",
            "tok",
            json!({
                "model_name": "herg-inhouse",
                "smiles": ["CCO", "CCN"],
                "labels": [1.0, 0.0],
                "is_classification": true
            }),
            r#"{"model_id": 981, "status": "queued"}"#,
        )
        .create_async()
        .await;

    let request = TrainRequest::new(
        "herg-inhouse",
        vec!["CCO".into(), "CCN".into()],
        vec![1.0, 0.0],
    )
    .classification(true);
    let response = api.client().train(&request).await.unwrap();

    assert_eq!(response.id.as_deref(), Some("981"));
    assert_eq!(response.status, Some(TaskStatus::Pending));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_train_trims_smiles_like_predict() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let mock = api
        .mock_post_json(
            "/train",
            "tok",
            json!({
                "model_name": "logd-inhouse",
                "smiles": ["CCO", "c1ccccc1"],
                "labels": [0.4, 2.1],
                "is_classification": false
            }),
            r#"{"id": "m-3"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let request = TrainRequest::new(
        "logd-inhouse",
        vec![" CCO".into(), "c1ccccc1\n".into()],
        vec![0.4, 2.1],
    );
    let response = api.client().train(&request).await.unwrap();

    assert_eq!(response.id.as_deref(), Some("m-3"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_hlm_submit_and_get() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let submit = api
        .mock_post_json(
            "/hlm",
            "tok",
            json!({"smiles": ["CCO"]}),
            r#"{"task_id":"hlm-1","status":"pending"}"#,
        )
        .create_async()
        .await;
    let get = api
        .mock_get(
            "/hlm/hlm-1",
            "tok",
            200,
            r#"{"task_id":"hlm-1","status":"completed","results":[{"smiles":"CCO","clint":12.5}]}"#,
        )
        .create_async()
        .await;

    let client = api.client();
    let submission = client.predict_hlm(&["CCO"]).await.unwrap();
    assert_eq!(submission.task_id, "hlm-1");

    let result = client.get_predict_hlm(&submission.task_id).await.unwrap();
    assert_eq!(result.status, TaskStatus::Completed);
    assert_eq!(result.results.unwrap()[0]["clint"], 12.5);

    submit.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_wait_for_hlm_polls_until_done() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let running = api
        .mock_get("/hlm/t9", "tok", 200, r#"{"task_id":"t9","status":"running"}"#)
        .expect(2)
        .create_async()
        .await;
    let done = api
        .mock_get(
            "/hlm/t9",
            "tok",
            200,
            r#"{"task_id":"t9","status":"completed","results":[]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let result = api
        .client()
        .wait_for_hlm("t9", Duration::from_millis(1), Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(result.status, TaskStatus::Completed);
    running.assert_async().await;
    done.assert_async().await;
}

#[tokio::test]
async fn test_wait_for_hlm_times_out() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let _running = api
        .server
        .mock("GET", format!("{API}/hlm/slow").as_str())
        .with_status(200)
        .with_body(r#"{"task_id":"slow","status":"running"}"#)
        .create_async()
        .await;

    let err = api
        .client()
        .wait_for_hlm("slow", Duration::from_millis(20), Duration::from_millis(50))
        .await
        .unwrap_err();

    match err {
        Error::TaskTimeout { task_id, status, .. } => {
            assert_eq!(task_id, "slow");
            assert_eq!(status, "running");
        }
        other => panic!("unexpected error: {other}"),
    }
}
