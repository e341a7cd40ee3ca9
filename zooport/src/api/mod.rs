//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response bodies
//!
//! # Response shape
//!
//! Both JSON actions answer with a `success` flag. On `true` the action-specific fields follow; on
//! `false` there is a single free-text `error`. Clients are expected to branch on `success` rather
//! than on the status code, which stays `200` for every outcome the client can fix by picking a
//! different animal or file.
//!
//! The OpenAPI document for these actions is served at `/openapi.json`, with a reference UI at
//! `/docs`.

pub mod handlers;
pub mod models;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "zooport", description = "Animal picker and file drop"),
    paths(handlers::animals::select_animal, handlers::uploads::upload_file),
    components(schemas(
        models::Rejection,
        models::animals::SelectAnimalRequest,
        models::animals::AnimalSelected,
        models::uploads::FileUploaded,
    )),
    tags(
        (name = "animals", description = "Animal picture lookup"),
        (name = "uploads", description = "File uploads to local disk"),
    )
)]
pub struct ApiDoc;
