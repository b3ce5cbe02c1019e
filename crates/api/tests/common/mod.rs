#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use irs_api::config::ServerConfig;
use irs_api::router::build_app_router;
use irs_api::state::AppState;
use irs_db::Store;

pub const BOUNDARY: &str = "----irs-test-boundary-7MA4YWxkTrZu0gW";

/// A router wired to a fresh store and a temporary upload directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<Store>,
    pub upload_dir: TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: None,
        upload_dir: upload_dir.to_path_buf(),
        max_body_bytes: 64 * 1024 * 1024,
    }
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Like [`build_test_app`], with config overrides applied first.
pub fn build_test_app_with(configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let upload_dir = TempDir::new().expect("temp upload dir");
    let mut config = test_config(upload_dir.path());
    configure(&mut config);
    let store = Arc::new(Store::new());
    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
    };
    TestApp {
        router: build_app_router(state, &config),
        store,
        upload_dir,
    }
}

impl TestApp {
    /// Names of the files currently in the upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Serve the router on an ephemeral local port.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}

/// Poll `check` for up to two seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: &TestApp, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Hand-built `multipart/form-data` body using [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBuilder {
    buf: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, mime: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// A complete, valid `issueData` payload.
pub fn valid_issue_json() -> serde_json::Value {
    serde_json::json!({
        "title": "Label printer jams",
        "description": "Printer jams after every 20 labels.",
        "platform": "windows",
        "productCategory": "hardware",
        "severity": "high",
        "frequency": "often",
        "reproducible": true,
        "stepsToReproduce": "Print 25 labels in one batch.",
        "expectedBehavior": "All labels print",
        "actualBehavior": "Paper jams at label 20",
        "hardwareVersion": "LP-200 rev B",
        "softwareVersion": "driver 5.1",
        "osVersion": "Windows 11",
        "reporter": "depot-3"
    })
}
