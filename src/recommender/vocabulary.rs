use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

/// Which course column a vocabulary encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryField {
    Type,
    Level,
}

impl CategoryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryField::Type => "type",
            CategoryField::Level => "level",
        }
    }
}

/// Closed mapping between a categorical value and its integer code
///
/// Classes are kept sorted, so a value's code is its position in that order.
/// Lookups of values that were never seen at fit time fail instead of
/// producing a new code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    field: CategoryField,
    classes: Vec<String>,
}

impl CategoryVocabulary {
    /// Learns the class list from every value in the corpus
    pub fn fit<'a, I>(field: CategoryField, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<String> = values.into_iter().map(normalize).collect();
        Self {
            field,
            classes: classes.into_iter().collect(),
        }
    }

    /// Code of `value`, after trimming and lower-casing it
    pub fn encode(&self, value: &str) -> AppResult<usize> {
        let normalized = normalize(value);
        self.classes
            .binary_search(&normalized)
            .map_err(|_| AppError::UnknownCategory {
                field: self.field.as_str(),
                value: value.to_string(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> CategoryVocabulary {
        CategoryVocabulary::fit(CategoryField::Type, ["online", "bootcamp", "Online", "degree"])
    }

    #[test]
    fn test_classes_are_sorted_and_deduplicated() {
        let vocab = types();
        assert_eq!(vocab.classes(), &["bootcamp", "degree", "online"]);
    }

    #[test]
    fn test_encode_returns_sorted_position() {
        let vocab = types();
        assert_eq!(vocab.encode("bootcamp").unwrap(), 0);
        assert_eq!(vocab.encode("degree").unwrap(), 1);
        assert_eq!(vocab.encode(" ONLINE ").unwrap(), 2);
        assert_eq!(vocab.classes()[2], "online");
    }

    #[test]
    fn test_unknown_value_fails() {
        let vocab = types();
        let err = vocab.encode("quantum-computing").unwrap_err();
        match err {
            AppError::UnknownCategory { field, value } => {
                assert_eq!(field, "type");
                assert_eq!(value, "quantum-computing");
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_level_field_is_reported() {
        let vocab = CategoryVocabulary::fit(CategoryField::Level, ["beginner"]);
        assert!(matches!(
            vocab.encode("expert"),
            Err(AppError::UnknownCategory { field: "level", .. })
        ));
    }
}
