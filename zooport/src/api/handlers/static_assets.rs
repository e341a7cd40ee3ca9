//! HTTP handlers for the page and its static assets.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::static_assets::Assets;

const INDEX: &str = "index.html";

/// Serve the application's single page
#[instrument]
pub async fn index() -> Response {
    serve_asset(INDEX)
}

/// Serve a file from the embedded `static/` directory
#[instrument(skip_all, fields(path = %path))]
pub async fn static_file(Path(path): Path<String>) -> Response {
    serve_asset(&path)
}

fn serve_asset(path: &str) -> Response {
    let Some(content) = Assets::get(path) else {
        debug!("No embedded asset at {path}");
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    // The page must pick up new builds immediately; pictures and scripts may be cached briefly
    let cache_control = if path == INDEX { "no-cache" } else { "public, max-age=3600" };

    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, cache_control.to_string()),
        ],
        content.data.into_owned(),
    )
        .into_response()
}
