use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::Rejection;
use crate::animals::Animal;

pub const INVALID_ANIMAL: &str = "Invalid animal selection";

/// Body of `POST /select_animal`.
///
/// `animal` is kept as raw JSON: `null`, numbers and other non-string values are answered with a
/// rejection rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SelectAnimalRequest {
    #[schema(value_type = Option<String>, example = "cat")]
    #[serde(default)]
    pub animal: Option<Value>,
}

impl SelectAnimalRequest {
    /// The selected animal, if the request names a known one exactly.
    pub fn animal(&self) -> Option<Animal> {
        self.animal.as_ref()?.as_str()?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnimalSelected {
    /// Always `true`
    pub success: bool,
    pub animal: String,
    /// Where the page can load the picture from
    pub image_url: String,
}

impl From<Animal> for AnimalSelected {
    fn from(animal: Animal) -> Self {
        Self {
            success: true,
            animal: animal.as_str().to_string(),
            image_url: animal.image_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectAnimalResponse {
    Selected(AnimalSelected),
    Rejected(Rejection),
}

impl From<Option<Animal>> for SelectAnimalResponse {
    fn from(animal: Option<Animal>) -> Self {
        match animal {
            Some(animal) => SelectAnimalResponse::Selected(animal.into()),
            None => SelectAnimalResponse::Rejected(Rejection::new(INVALID_ANIMAL)),
        }
    }
}
