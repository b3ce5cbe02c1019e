//! Uploads written for a request that never completes must not stay on disk.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use common::{body_json, eventually, post_multipart, valid_issue_json, MultipartBuilder, BOUNDARY};

/// Open a raw connection and send the head of a multipart submission whose
/// declared length is never reached, followed by the start of a `files` part.
async fn start_stalled_upload(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "POST /api/issues HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Content-Type: multipart/form-data; boundary={BOUNDARY}\r\n\
         Content-Length: 1048576\r\n\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"stall.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         partial-jpeg-bytes"
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
    stream
}

/// Read until the status line of the response is available.
async fn read_status_line(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let read = async {
        while !buf.windows(2).any(|w| w == b"\r\n") {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("no response from server");
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn stalled_upload_is_removed_when_request_times_out() {
    let app = common::build_test_app_with(|config| config.request_timeout_secs = Some(1));
    let addr = app.serve().await;

    let mut stream = start_stalled_upload(addr).await;
    assert!(
        eventually(|| !app.uploaded_files().is_empty()).await,
        "upload was never started"
    );

    let status = read_status_line(&mut stream).await;
    assert!(status.contains("408"), "unexpected status line {status:?}");
    assert!(
        eventually(|| app.uploaded_files().is_empty()).await,
        "left behind: {:?}",
        app.uploaded_files()
    );
    assert_eq!(app.store.counts().await.issues, 0);
}

#[tokio::test]
async fn upload_is_removed_when_client_disconnects() {
    let app = common::build_test_app();
    let addr = app.serve().await;

    let stream = start_stalled_upload(addr).await;
    assert!(
        eventually(|| !app.uploaded_files().is_empty()).await,
        "upload was never started"
    );

    drop(stream);
    assert!(
        eventually(|| app.uploaded_files().is_empty()).await,
        "left behind: {:?}",
        app.uploaded_files()
    );
    assert_eq!(app.store.counts().await.issues, 0);
}

#[tokio::test]
async fn truncated_body_after_file_part_returns_400_and_removes_file() {
    let app = common::build_test_app();
    // No closing boundary: the stream ends inside the multipart body.
    let mut body = MultipartBuilder::new()
        .text("issueData", &valid_issue_json().to_string())
        .file("files", "cut.jpg", "image/jpeg", b"\xff\xd8\xff\xe0jpeg")
        .finish();
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());

    let response = post_multipart(&app, "/api/issues", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    assert!(app.uploaded_files().is_empty());
    assert_eq!(app.store.counts().await.issues, 0);
}

#[tokio::test]
async fn body_over_limit_returns_413_and_keeps_nothing() {
    let app = common::build_test_app_with(|config| config.max_body_bytes = 4096);
    let body = MultipartBuilder::new()
        .text("issueData", &valid_issue_json().to_string())
        .file("files", "big.bin", "application/octet-stream", &vec![0u8; 8192])
        .finish();

    let response = post_multipart(&app, "/api/issues", body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");

    assert!(app.uploaded_files().is_empty());
    assert_eq!(app.store.counts().await.issues, 0);
}
