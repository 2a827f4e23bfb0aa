//! Error classification and retry behavior

use crate::integration::mock_server::{MockApi, API};
use deepmirror::error_code::ErrorClass;
use deepmirror::Error;
use mockito::Matcher;

#[tokio::test]
async fn test_retry_on_transient_error() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let unavailable = api
        .mock_get("/models/", "tok", 503, r#"{"detail":"Service Unavailable"}"#)
        .expect(1)
        .create_async()
        .await;
    let ok = api
        .mock_get("/models/", "tok", 200, r#"[{"id":"solubility"}]"#)
        .expect(1)
        .create_async()
        .await;

    let models = api.client().list_models().await.unwrap();

    assert_eq!(models[0].id, "solubility");
    unavailable.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    // One initial attempt plus two retries.
    let failing = api
        .mock_get("/models/", "tok", 500, "Internal Server Error")
        .expect(3)
        .create_async()
        .await;

    let err = api.client().list_models().await.unwrap_err();

    assert_eq!(err.class(), Some(ErrorClass::ServerError));
    assert!(err.to_string().contains("Internal Server Error"));
    failing.assert_async().await;
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let invalid = api
        .server
        .mock("POST", format!("{API}/inference/logd").as_str())
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":[{"loc":["body","smiles",0],"msg":"invalid SMILES"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let err = api.client().predict("logd", &["C1CC"]).await.unwrap_err();

    match err {
        Error::Remote {
            status,
            class,
            message,
            ..
        } => {
            assert_eq!(status, 422);
            assert_eq!(class, ErrorClass::InvalidRequest);
            assert_eq!(message, "invalid SMILES");
        }
        other => panic!("unexpected error: {other}"),
    }
    invalid.assert_async().await;
}

#[tokio::test]
async fn test_not_found_model() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let missing = api
        .mock_get("/models/nope", "tok", 404, r#"{"detail":"Model not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = api.client().model_info("nope").await.unwrap_err();

    assert_eq!(err.class(), Some(ErrorClass::NotFound));
    missing.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_a_serialization_error() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let _m = api
        .mock_get("/models/", "tok", 200, "<html>oops</html>")
        .create_async()
        .await;

    let err = api.client().list_models().await.unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn test_requests_carry_request_id_and_user_agent() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let user_agent = concat!("deepmirror-rust/", env!("CARGO_PKG_VERSION"));
    let mock = api
        .mock_get("/models/", "tok", 200, "[]")
        .match_header(
            "x-request-id",
            Matcher::Regex(
                r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$".to_string(),
            ),
        )
        .match_header("user-agent", user_agent)
        .expect(1)
        .create_async()
        .await;

    api.client().list_models().await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_retries_after_server_delay() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let limited = api
        .mock_get("/models/", "tok", 429, r#"{"detail":"Too many requests"}"#)
        .with_header("retry-after", "0")
        .expect(1)
        .create_async()
        .await;
    let ok = api
        .mock_get("/models/", "tok", 200, r#"[{"id":"logd"}]"#)
        .expect(1)
        .create_async()
        .await;

    let models = api.client().list_models().await.unwrap();

    assert_eq!(models[0].id, "logd");
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_retry_after_header_is_reported() {
    let mut api = MockApi::new().await;
    api.write_token("tok");
    let limited = api
        .mock_get("/models/", "tok", 429, r#"{"detail":"Too many requests"}"#)
        .with_header("retry-after", "3")
        .expect(1)
        .create_async()
        .await;

    let err = api.client_without_retries().list_models().await.unwrap_err();

    match err {
        Error::Remote {
            status,
            class,
            retry_after_ms,
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(class, ErrorClass::RateLimited);
            assert_eq!(retry_after_ms, Some(3_000));
        }
        other => panic!("unexpected error: {other}"),
    }
    limited.assert_async().await;
}
