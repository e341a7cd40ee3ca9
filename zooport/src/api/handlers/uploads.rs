//! HTTP handler for file uploads.

use axum::{
    Json,
    extract::{Multipart, State, multipart::{MultipartError, MultipartRejection}},
    http::StatusCode,
};
use bytes::Bytes;
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::api::models::uploads::{FILE_TYPE_NOT_ALLOWED, FileUploaded, INVALID_FILENAME, NO_FILE_SELECTED, UploadResponse};
use crate::errors::{Error, Result};
use crate::uploads::{allowed_file, format_file_size, sanitize_filename};

/// Name of the multipart part carrying the file.
const FILE_FIELD: &str = "file";

/// The file part of an upload, read into memory.
struct ReceivedFile {
    filename: String,
    content_type: Option<String>,
    content: Bytes,
}

#[utoipa::path(
    post,
    path = "/upload_file",
    tag = "uploads",
    summary = "Upload file",
    description = "Store the `file` part of a multipart body in the upload directory under a sanitized name, \
                   replacing any previous file of that name. The extension is only checked when the \
                   allow-list is enforced in configuration.",
    request_body(content_type = "multipart/form-data", description = "Multipart body with a `file` part"),
    responses(
        (status = 200, description = "Upload result; check `success`", body = FileUploaded),
        (status = 400, description = "Malformed multipart body", body = crate::api::models::Rejection),
        (status = 413, description = "Payload too large", body = crate::api::models::Rejection),
        (status = 500, description = "Internal server error", body = crate::api::models::Rejection),
    )
)]
#[instrument(skip_all)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    // A body that is not multipart at all carries no file
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Upload without a multipart body");
            return Ok(Json(UploadResponse::rejected(NO_FILE_SELECTED)));
        }
    };

    let Some(received) = read_file_field(&mut multipart).await? else {
        return Ok(Json(UploadResponse::rejected(NO_FILE_SELECTED)));
    };

    if received.filename.is_empty() {
        return Ok(Json(UploadResponse::rejected(NO_FILE_SELECTED)));
    }

    let filename = sanitize_filename(&received.filename);
    if filename.is_empty() {
        debug!(original = %received.filename, "Filename sanitized to nothing");
        return Ok(Json(UploadResponse::rejected(INVALID_FILENAME)));
    }

    let upload_config = &state.config.upload;
    if upload_config.enforce_extension_allow_list && !allowed_file(&filename, &upload_config.allowed_extensions) {
        debug!(filename = %filename, "Extension not in allow-list");
        return Ok(Json(UploadResponse::rejected(FILE_TYPE_NOT_ALLOWED)));
    }

    let stored = state.store.save(&filename, received.content).await?;

    info!(
        filename = %filename,
        original = %received.filename,
        size_bytes = stored.size_bytes,
        content_type = ?received.content_type,
        "Stored upload"
    );

    Ok(Json(UploadResponse::Uploaded(FileUploaded::new(
        filename,
        format_file_size(stored.size_bytes),
        received.content_type,
    ))))
}

/// Find the first `file` part that carries a filename and read it.
///
/// Parts without a filename are form values, not files, and are skipped. Every other part is
/// still read to the end, so bytes after the file count against the body cap before anything is
/// written.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<ReceivedFile>> {
    let mut received = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let wanted = received.is_none() && field.name() == Some(FILE_FIELD);

        match field.file_name().map(str::to_owned) {
            Some(filename) if wanted => {
                let content_type = field.content_type().map(str::to_owned);
                let content = field.bytes().await.map_err(multipart_error)?;

                received = Some(ReceivedFile {
                    filename,
                    content_type,
                    content,
                });
            }
            _ => while field.chunk().await.map_err(multipart_error)?.is_some() {},
        }
    }

    Ok(received)
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            message: "Request body exceeds the maximum allowed size".to_string(),
        }
    } else {
        Error::BadRequest {
            message: format!("Failed to parse multipart data: {}", err.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, create_test_app_with, create_test_config};
    use crate::uploads::LocalUploadStore;
    use crate::{AppState, build_router};
    use axum::Router;
    use axum::body::Body;
    use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};
    use bytes::Bytes;
    use serde_json::{Value, json};

    const BOUNDARY: &str = "zooport-test-boundary";

    /// Build a multipart body by hand, for shapes the form builder cannot express.
    fn raw_multipart(part_headers: &str, content: &str) -> Bytes {
        Bytes::from(format!(
            "--{BOUNDARY}\r\n{part_headers}\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        ))
    }

    async fn post_raw(server: &TestServer, body: Bytes) -> axum_test::TestResponse {
        server
            .post("/upload_file")
            .bytes(body)
            .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
            .await
    }

    fn file_form(name: &str, content: &'static [u8], mime: &str) -> MultipartForm {
        MultipartForm::new().add_part("file", Part::bytes(content).file_name(name).mime_type(mime))
    }

    /// Bare router with a small body cap, for requests the test server cannot shape.
    fn capped_router(max_request_bytes: u64) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = create_test_config(&dir);
        config.upload.max_request_bytes = max_request_bytes;
        let state = AppState::builder()
            .config(config)
            .store(Arc::new(LocalUploadStore::new(dir.path())))
            .build();
        (build_router(state), dir)
    }

    #[tokio::test]
    async fn test_upload_reports_metadata_and_writes_file() {
        let (server, dir) = create_test_app().await;

        let response = server
            .post("/upload_file")
            .multipart(file_form("notes.txt", b"hello", "text/plain"))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({
            "success": true,
            "filename": "notes.txt",
            "file_size": "5.0 B",
            "file_type": "text/plain",
        }));
        assert_eq!(std::fs::read(dir.path().join("notes.txt")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_any_extension_is_accepted_by_default() {
        let (server, dir) = create_test_app().await;

        for name in ["installer.exe", "script.sh", "README"] {
            let response = server
                .post("/upload_file")
                .multipart(file_form(name, b"binary", "application/octet-stream"))
                .await;

            response.assert_status(StatusCode::OK);
            let body: Value = response.json();
            assert_eq!(body["success"], json!(true), "{name}");
            assert_eq!(body["filename"], json!(name));
            assert!(dir.path().join(name).exists());
        }
    }

    #[tokio::test]
    async fn test_traversal_is_sanitized_away() {
        let (server, dir) = create_test_app().await;

        let response = server
            .post("/upload_file")
            .multipart(file_form("../../evil.sh", b"#!/bin/sh", "text/x-sh"))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["filename"], json!("evil.sh"));
        assert!(dir.path().join("evil.sh").exists());
    }

    #[tokio::test]
    async fn test_name_with_nothing_safe_is_rejected() {
        let (server, dir) = create_test_app().await;

        let response = post_raw(
            &server,
            raw_multipart("Content-Disposition: form-data; name=\"file\"; filename=\"../\"", "data"),
        )
        .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "Invalid filename" }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let (server, _dir) = create_test_app().await;

        let form = MultipartForm::new().add_text("comment", "no file here");
        let response = server.post("/upload_file").multipart(form).await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "No file selected" }));
    }

    #[tokio::test]
    async fn test_file_field_without_filename_is_not_a_file() {
        let (server, _dir) = create_test_app().await;

        let form = MultipartForm::new().add_text("file", "just text");
        let response = server.post("/upload_file").multipart(form).await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "No file selected" }));
    }

    #[tokio::test]
    async fn test_empty_filename() {
        let (server, dir) = create_test_app().await;

        let response = post_raw(
            &server,
            raw_multipart(
                "Content-Disposition: form-data; name=\"file\"; filename=\"\"\r\nContent-Type: application/octet-stream",
                "",
            ),
        )
        .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "No file selected" }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_body() {
        let (server, _dir) = create_test_app().await;

        let response = server.post("/upload_file").json(&json!({ "file": "nope" })).await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "No file selected" }));
    }

    #[tokio::test]
    async fn test_missing_content_type_reports_unknown() {
        let (server, _dir) = create_test_app().await;

        let response = post_raw(
            &server,
            raw_multipart("Content-Disposition: form-data; name=\"file\"; filename=\"plain.dat\"", "abc"),
        )
        .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({
            "success": true,
            "filename": "plain.dat",
            "file_size": "3.0 B",
            "file_type": "Unknown",
        }));
    }

    #[tokio::test]
    async fn test_reupload_overwrites_previous_file() {
        let (server, dir) = create_test_app().await;

        let big = vec![b'x'; 2048];
        let form = MultipartForm::new().add_part("file", Part::bytes(big).file_name("same.txt").mime_type("text/plain"));
        let response = server.post("/upload_file").multipart(form).await;
        let body: Value = response.json();
        assert_eq!(body["file_size"], json!("2.0 KB"));

        let response = server
            .post("/upload_file")
            .multipart(file_form("same.txt", b"small", "text/plain"))
            .await;
        let body: Value = response.json();
        assert_eq!(body["file_size"], json!("5.0 B"));

        assert_eq!(std::fs::read(dir.path().join("same.txt")).unwrap(), b"small");
    }

    #[tokio::test]
    async fn test_enforced_allow_list_rejects_unknown_extensions() {
        let (server, dir) = create_test_app_with(|config| {
            config.upload.enforce_extension_allow_list = true;
        })
        .await;

        let response = server
            .post("/upload_file")
            .multipart(file_form("setup.exe", b"MZ", "application/octet-stream"))
            .await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "success": false, "error": "File type not allowed" }));
        assert!(!dir.path().join("setup.exe").exists());

        let response = server
            .post("/upload_file")
            .multipart(file_form("photo.JPG", b"\xff\xd8", "image/jpeg"))
            .await;
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert!(dir.path().join("photo.JPG").exists());
    }

    #[tokio::test]
    async fn test_streamed_data_after_the_file_counts_against_the_cap() {
        let (router, dir) = capped_router(1024);

        // No Content-Length: the file arrives in the first chunk, the overflow in the second
        let file_part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"small.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhello\r\n"
        );
        let junk_part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"junk\"\r\n\r\n{}\r\n--{BOUNDARY}--\r\n",
            "x".repeat(4096)
        );
        let chunks = vec![Ok::<_, std::io::Error>(Bytes::from(file_part)), Ok(Bytes::from(junk_part))];

        let request = Request::builder()
            .method("POST")
            .uri("/upload_file")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from_stream(futures::stream::iter(chunks)))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], json!(false));
        assert!(!dir.path().join("small.txt").exists());
    }

    #[tokio::test]
    async fn test_declared_length_over_the_cap_is_rejected() {
        let (router, dir) = capped_router(1024);

        let body = raw_multipart(
            "Content-Disposition: form-data; name=\"file\"; filename=\"small.txt\"",
            "hello",
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload_file")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .header(CONTENT_LENGTH, "4300")
            .body(Body::from(body))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!dir.path().join("small.txt").exists());
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let (server, dir) = create_test_app_with(|config| {
            config.upload.max_request_bytes = 1024;
        })
        .await;

        let form = MultipartForm::new().add_part("file", Part::bytes(vec![0u8; 8192]).file_name("big.bin"));
        let response = server.post("/upload_file").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(!dir.path().join("big.bin").exists());
    }
}
