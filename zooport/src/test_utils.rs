//! Helpers for handler tests.

use axum_test::TestServer;
use tempfile::TempDir;

use crate::{Application, config::Config};

pub fn create_test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.upload.dir = upload_dir.path().to_path_buf();
    config
}

/// Test server writing uploads into a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped, so keep it alive for the
/// duration of the test.
pub async fn create_test_app() -> (TestServer, TempDir) {
    create_test_app_with(|_| {}).await
}

/// Like [`create_test_app`], with a hook to adjust the configuration first.
pub async fn create_test_app_with(configure: impl FnOnce(&mut Config)) -> (TestServer, TempDir) {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = create_test_config(&upload_dir);
    configure(&mut config);

    let app = Application::new(config).await.expect("Failed to create application");
    (app.into_test_server(), upload_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_healthz() {
        let (server, _dir) = create_test_app().await;

        let response = server.get("/healthz").await;
        response.assert_status(StatusCode::OK);
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_both_actions() {
        let (server, _dir) = create_test_app().await;

        let response = server.get("/openapi.json").await;
        response.assert_status(StatusCode::OK);

        let doc: serde_json::Value = response.json();
        assert!(doc["paths"].get("/select_animal").is_some());
        assert!(doc["paths"].get("/upload_file").is_some());
    }

    #[tokio::test]
    async fn test_docs_page_is_served() {
        let (server, _dir) = create_test_app().await;

        server.get("/docs").await.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_directory_is_created_at_startup() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("data").join("uploads");

        let mut config = Config::default();
        config.upload.dir = nested.clone();
        Application::new(config).await.unwrap();

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (server, _dir) = create_test_app().await;

        server.get("/nope").await.assert_status(StatusCode::NOT_FOUND);
    }
}
