#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use institute_portal::{
    AppConfig, AppState, MockRepository, MockStorageService, create_router,
    config::Env,
    repository::RepositoryState,
    storage::StorageState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "X-PORTAL-TEST-BOUNDARY";

/// A router over in-memory services, with handles kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MockRepository>,
    pub storage: Arc<MockStorageService>,
    pub config: AppConfig,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(MockRepository::new(), MockStorageService::new(), AppConfig::default())
}

pub fn spawn_production_app(repo: MockRepository) -> TestApp {
    let config = AppConfig {
        env: Env::Production,
        jwt_secret: "integration-test-secret".to_string(),
        ..AppConfig::default()
    };
    spawn_app_with(repo, MockStorageService::new(), config)
}

pub fn spawn_app_with(
    repo: MockRepository,
    storage: MockStorageService,
    config: AppConfig,
) -> TestApp {
    let repo = Arc::new(repo);
    let storage = Arc::new(storage);
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        storage: storage.clone() as StorageState,
        config: config.clone(),
    };

    TestApp {
        router: create_router(state),
        repo,
        storage,
        config,
    }
}

/// A fixed-length identifier for tests that need a well-formed but unknown uuid.
pub fn uuid_of(seed: char) -> String {
    seed.to_string().repeat(21)
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::delete(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(method, uri, body)).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        self.send(multipart_request(method, uri, fields, file)).await
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a `multipart/form-data` body by hand: text fields first, then at most one file
/// part given as `(field, file_name, bytes)`.
pub fn multipart_request(
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// The issue codes of a 422 body, in response order.
pub fn issue_codes(body: &Value) -> Vec<String> {
    body["error"]["issues"]
        .as_array()
        .map(|issues| {
            issues
                .iter()
                .filter_map(|issue| issue["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
