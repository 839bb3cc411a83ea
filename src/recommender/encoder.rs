use serde::{Deserialize, Serialize};

use super::tfidf::SkillVectorizer;
use super::vocabulary::{CategoryField, CategoryVocabulary};
use crate::error::AppResult;
use crate::models::Course;

/// Skill weights followed by the type code and the level code
pub type FeatureVector = Vec<f64>;

/// Turns courses and raw queries into fixed-width feature vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    skills: SkillVectorizer,
    types: CategoryVocabulary,
    levels: CategoryVocabulary,
}

impl FeatureEncoder {
    /// Fits every vocabulary on the catalog
    pub fn fit(courses: &[Course], max_features: usize) -> Self {
        let documents: Vec<String> = courses.iter().map(Course::skills_text).collect();
        Self {
            skills: SkillVectorizer::fit(&documents, max_features),
            types: CategoryVocabulary::fit(
                CategoryField::Type,
                courses.iter().map(|c| c.course_type.as_str()),
            ),
            levels: CategoryVocabulary::fit(
                CategoryField::Level,
                courses.iter().map(|c| c.level.as_str()),
            ),
        }
    }

    /// Encodes a query. Fails with `UnknownCategory` for an untrained type or level.
    pub fn encode(&self, skills_text: &str, course_type: &str, level: &str) -> AppResult<FeatureVector> {
        let type_code = self.types.encode(course_type)?;
        let level_code = self.levels.encode(level)?;

        let mut features = self.skills.transform(&skills_text.to_lowercase());
        features.push(type_code as f64);
        features.push(level_code as f64);
        Ok(features)
    }

    pub fn encode_course(&self, course: &Course) -> AppResult<FeatureVector> {
        self.encode(&course.skills_text(), &course.course_type, &course.level)
    }

    pub fn width(&self) -> usize {
        self.skills.vocabulary_size() + 2
    }

    pub fn skills(&self) -> &SkillVectorizer {
        &self.skills
    }

    pub fn types(&self) -> &CategoryVocabulary {
        &self.types
    }

    pub fn levels(&self) -> &CategoryVocabulary {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn catalog() -> Vec<Course> {
        vec![
            Course::new("A", "Online", "Beginner", "Python, Excel", "4 weeks", "https://a"),
            Course::new("B", "Bootcamp", "Intermediate", "SQL, Machine Learning", "8 weeks", "https://b"),
            Course::new("C", "Online", "Advanced", "", "2 weeks", "https://c"),
        ]
    }

    #[test]
    fn test_every_course_has_fixed_width() {
        let courses = catalog();
        let encoder = FeatureEncoder::fit(&courses, 1000);
        for course in &courses {
            let features = encoder.encode_course(course).unwrap();
            assert_eq!(features.len(), encoder.skills().vocabulary_size() + 2);
            assert_eq!(features.len(), encoder.width());
        }
    }

    #[test]
    fn test_query_appends_category_codes() {
        let encoder = FeatureEncoder::fit(&catalog(), 1000);
        let features = encoder.encode("python", "online", "intermediate").unwrap();
        let width = encoder.width();
        // bootcamp < online, advanced < beginner < intermediate
        assert_eq!(features[width - 2], 1.0);
        assert_eq!(features[width - 1], 2.0);
    }

    #[test]
    fn test_malformed_skills_encode_to_zero_weights() {
        let encoder = FeatureEncoder::fit(&catalog(), 1000);
        let features = encoder.encode(" , ,", "Online", "Beginner").unwrap();
        assert_eq!(features.len(), encoder.width());
        assert!(features[..encoder.width() - 2].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let encoder = FeatureEncoder::fit(&catalog(), 1000);
        let err = encoder
            .encode("python", "quantum-computing", "beginner")
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { field: "type", .. }));
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let encoder = FeatureEncoder::fit(&catalog(), 1000);
        let err = encoder.encode("python", "online", "expert").unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { field: "level", .. }));
    }
}
