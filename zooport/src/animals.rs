//! The fixed set of selectable animals.

use std::fmt;
use std::str::FromStr;

/// An animal that has a picture shipped with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animal {
    Cat,
    Dog,
    Elephant,
}

/// Returned when a label is not one of the known animals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnimal(pub String);

impl fmt::Display for UnknownAnimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown animal {:?}", self.0)
    }
}

impl std::error::Error for UnknownAnimal {}

impl Animal {
    pub const ALL: [Animal; 3] = [Animal::Cat, Animal::Dog, Animal::Elephant];

    pub fn as_str(self) -> &'static str {
        match self {
            Animal::Cat => "cat",
            Animal::Dog => "dog",
            Animal::Elephant => "elephant",
        }
    }

    /// Path the page loads the animal's picture from.
    pub fn image_url(self) -> String {
        format!("/static/images/{}.jpg", self.as_str())
    }
}

impl FromStr for Animal {
    type Err = UnknownAnimal;

    /// Exact, case-sensitive match against the known labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Animal::ALL
            .into_iter()
            .find(|animal| animal.as_str() == s)
            .ok_or_else(|| UnknownAnimal(s.to_string()))
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_parse() {
        for animal in Animal::ALL {
            assert_eq!(animal.as_str().parse::<Animal>(), Ok(animal));
        }
    }

    #[test]
    fn test_image_url_contains_label() {
        assert_eq!(Animal::Cat.image_url(), "/static/images/cat.jpg");
        assert_eq!(Animal::Dog.image_url(), "/static/images/dog.jpg");
        assert_eq!(Animal::Elephant.image_url(), "/static/images/elephant.jpg");
    }

    #[test]
    fn test_unknown_labels_rejected() {
        for label in ["", "Cat", "CAT", " cat", "cat ", "giraffe", "1", "cats", "static/images/cat"] {
            assert_eq!(label.parse::<Animal>(), Err(UnknownAnimal(label.to_string())), "{label:?}");
        }
    }
}
