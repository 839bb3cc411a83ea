use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Difficulty tiers that make up a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Parses a level label case-insensitively; anything else has no tier
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Some(Level::Beginner),
            "intermediate" => Some(Level::Intermediate),
            "advanced" => Some(Level::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A course from the training catalog
///
/// `course_type`, `level` and `skills_covered` are stored lower-cased.
/// Records are immutable once the model is trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub course_type: String,
    pub level: String,
    pub skills_covered: Vec<String>,
    pub duration: String,
    pub url: String,
}

impl Course {
    /// Builds a course from raw catalog fields, normalizing the categorical and skill columns
    pub fn new(
        title: impl Into<String>,
        course_type: &str,
        level: &str,
        skills_covered: &str,
        duration: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            course_type: course_type.trim().to_lowercase(),
            level: level.trim().to_lowercase(),
            skills_covered: split_skills(&skills_covered.to_lowercase()),
            duration: duration.into(),
            url: url.into(),
        }
    }

    /// The roadmap tier of this course, if its level is one of the known tiers
    pub fn tier(&self) -> Option<Level> {
        Level::parse(&self.level)
    }

    /// Skills joined back into the catalog's comma-separated form
    pub fn skills_text(&self) -> String {
        self.skills_covered.join(", ")
    }
}

/// Splits a comma-separated skills string into trimmed, non-empty tokens
///
/// Case is left untouched; callers lower-case first where required.
pub fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
