//! Up-front rejection of requests that declare a body over the configured cap.
//!
//! axum's `DefaultBodyLimit` only fails once that many bytes have actually been read, so a handler
//! that stops reading early never sees it. This middleware answers `413` from the declared
//! `Content-Length` before any handler runs. Bodies without a declared length still go through
//! `DefaultBodyLimit`.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::errors::Error;

/// Reject requests whose `Content-Length` exceeds `limit` bytes.
pub async fn reject_oversized_body(State(limit): State<usize>, request: Request<Body>, next: Next) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    if let Some(declared) = declared
        && declared > limit as u64
    {
        debug!(declared, limit, path = %request.uri().path(), "Declared body over the cap");
        return Error::PayloadTooLarge {
            message: "Request body exceeds the maximum allowed size".to_string(),
        }
        .into_response();
    }

    next.run(request).await
}
