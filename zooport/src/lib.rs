//! # zooport: animal picker and file drop
//!
//! `zooport` is a small web service behind a single HTML page. It does two things:
//!
//! - **Animal selection** (`POST /select_animal`): the page sends one of `cat`, `dog` or
//!   `elephant` and gets back the URL of the matching picture. Anything else is answered with
//!   `success: false`.
//! - **File upload** (`POST /upload_file`): the page sends a multipart body with a `file` part.
//!   The file is written to the upload directory under a sanitized name, replacing any previous
//!   file of that name, and the response reports the stored name, a human readable size and the
//!   content type the client declared.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum). Handlers live in [`api::handlers`]
//! and share an [`AppState`] holding the loaded [`Config`] and the [`uploads::UploadStore`] files
//! are written to. The domain pieces are plain functions that can be tested without HTTP:
//!
//! - [`animals`]: the fixed set of selectable animals
//! - [`uploads::filename`]: filename sanitization and the extension allow-list
//! - [`uploads::size`]: byte count formatting
//! - [`uploads::storage`]: writing uploads to disk
//!
//! Faults that are not the client's choice of input (malformed bodies, oversized requests, disk
//! errors) go through [`errors::Error`], which maps them to status codes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use zooport::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = zooport::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     zooport::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod animals;
pub mod api;
mod body_limit;
pub mod config;
pub mod errors;
mod static_assets;
pub mod telemetry;
pub mod uploads;

#[cfg(test)]
mod test_utils;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::uploads::{LocalUploadStore, UploadStore};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .store(Arc::new(LocalUploadStore::new("uploads")))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UploadStore>,
}

/// Build the application router.
///
/// - `GET /` and `GET /static/*`: the page and its embedded assets
/// - `POST /select_animal`, `POST /upload_file`: the JSON actions
/// - `GET /healthz`: liveness check
/// - `GET /docs`: OpenAPI reference for the JSON actions
///
/// Every route shares the configured request body cap, checked against the declared
/// `Content-Length` up front and against the bytes actually read. Requests are traced at INFO.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/", get(api::handlers::static_assets::index))
        .route("/static/{*path}", get(api::handlers::static_assets::static_file))
        .route("/select_animal", post(api::handlers::animals::select_animal))
        .route("/upload_file", post(api::handlers::uploads::upload_file))
        .route("/healthz", get(|| async { "OK" }))
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::ApiDoc::openapi()))
        .route("/openapi.json", get(|| async { axum::Json(api::ApiDoc::openapi()) }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(body_limit, crate::body_limit::reject_oversized_body))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// A configured server, ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create the upload directory and build the router.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting zooport with configuration: {:#?}", config);

        let store = LocalUploadStore::new(&config.upload.dir);
        store.ensure_dir().await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to create upload directory {}: {}",
                config.upload.dir.display(),
                e
            )
        })?;
        info!(upload_dir = %store.base_path().display(), "Upload directory ready");

        let state = AppState::builder().config(config.clone()).store(Arc::new(store)).build();
        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "zooport listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
