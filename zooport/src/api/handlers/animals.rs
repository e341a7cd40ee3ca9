//! HTTP handler for animal selection.

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use tracing::{debug, instrument};

use crate::api::models::animals::{SelectAnimalRequest, SelectAnimalResponse};
use crate::errors::{Error, Result};

#[utoipa::path(
    post,
    path = "/select_animal",
    tag = "animals",
    summary = "Select animal",
    description = "Look up the picture for one of `cat`, `dog` or `elephant`. Any other value is answered \
                   with `success: false` and the message `Invalid animal selection`.",
    request_body = SelectAnimalRequest,
    responses(
        (status = 200, description = "Selection result; check `success`", body = crate::api::models::animals::AnimalSelected),
        (status = 400, description = "Body is not a JSON object or not sent as JSON", body = crate::api::models::Rejection),
        (status = 413, description = "Payload too large", body = crate::api::models::Rejection),
    )
)]
#[instrument(skip_all)]
pub async fn select_animal(payload: std::result::Result<Json<SelectAnimalRequest>, JsonRejection>) -> Result<Json<SelectAnimalResponse>> {
    let Json(request) = payload.map_err(json_error)?;

    let selected = request.animal();
    debug!(requested = ?request.animal, selected = ?selected, "Animal selection");

    Ok(Json(selected.into()))
}

fn json_error(rejection: JsonRejection) -> Error {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            message: rejection.body_text(),
        }
    } else {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}
