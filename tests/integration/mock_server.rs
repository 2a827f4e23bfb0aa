//! Mock API server setup for integration tests

use deepmirror::auth::FileTokenStore;
use deepmirror::transport::RetryConfig;
use deepmirror::{Credentials, DeepMirrorClient, Settings};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const API: &str = "/api/v3/public";

/// Test fixture owning a mock server and a private token directory.
pub struct MockApi {
    pub server: ServerGuard,
    pub dir: TempDir,
}

impl MockApi {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.path().join("deepmirror").join("token")
    }

    pub fn write_token(&self, token: &str) {
        let path = self.token_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, token).unwrap();
    }

    pub fn read_token(&self) -> Option<String> {
        std::fs::read_to_string(self.token_path()).ok()
    }

    fn settings(&self) -> Settings {
        Settings {
            host: self.server.url(),
            token_file: self.token_path(),
            ..Settings::default()
        }
    }

    /// A client as a fresh CLI invocation would build it, without env lookups.
    pub fn client(&self) -> DeepMirrorClient {
        self.builder().build().expect("client")
    }

    pub fn client_with_credentials(&self) -> DeepMirrorClient {
        self.builder()
            .credentials(Credentials::new("chemist@example.com", "s3cret"))
            .build()
            .expect("client")
    }

    /// Like [`client`](Self::client) but every failure is final.
    pub fn client_without_retries(&self) -> DeepMirrorClient {
        self.builder()
            .retry(RetryConfig {
                max_retries: 0,
                ..fast_retry()
            })
            .build()
            .expect("client")
    }

    fn builder(&self) -> deepmirror::DeepMirrorClientBuilder {
        DeepMirrorClient::builder()
            .settings(self.settings())
            .token_store(Arc::new(FileTokenStore::new(self.token_path())))
            .retry(fast_retry())
            .use_env(false)
    }

    /// Successful login for the default test credentials. Not yet created.
    pub fn mock_login(&mut self, token: &str) -> Mock {
        self.server
            .mock("POST", format!("{API}/login").as_str())
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "chemist@example.com".into()),
                Matcher::UrlEncoded("password".into(), "s3cret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"access_token":"{token}","token_type":"bearer"}}"#))
    }

    /// Authenticated GET answering with a JSON body.
    pub fn mock_get(&mut self, path: &str, token: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", format!("{API}{path}").as_str())
            .match_header("authorization", format!("Bearer {token}").as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Authenticated POST whose JSON body must equal `expected`.
    pub fn mock_post_json(
        &mut self,
        path: &str,
        token: &str,
        expected: serde_json::Value,
        body: &str,
    ) -> Mock {
        self.server
            .mock("POST", format!("{API}{path}").as_str())
            .match_header("authorization", format!("Bearer {token}").as_str())
            .match_body(Matcher::Json(expected))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 2,
        min_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}
