use serde::{Deserialize, Serialize};

use super::{Course, LinkPreview};

/// Body of `POST /api/v1/recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub course_type: String,
    pub level: String,
    /// Free-text skills, comma-separated, most important first
    #[serde(default)]
    pub skills: String,
    /// Length of the primary list; defaults to the model's trained neighbor count
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default = "default_include_previews")]
    pub include_previews: bool,
}

fn default_include_previews() -> bool {
    true
}

/// A course as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseView {
    pub title: String,
    #[serde(rename = "type")]
    pub course_type: String,
    pub level: String,
    pub skills_covered: Vec<String>,
    pub duration: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<LinkPreview>,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            course_type: course.course_type.clone(),
            level: course.level.clone(),
            skills_covered: course.skills_covered.clone(),
            duration: course.duration.clone(),
            url: course.url.clone(),
            preview: None,
        }
    }
}

/// Entry of the primary (nearest neighbor) list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCourse {
    #[serde(flatten)]
    pub course: CourseView,
    /// Cosine distance to the query, 0.0 is an exact match
    pub distance: f64,
}

/// Entry of one roadmap level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapCourse {
    #[serde(flatten)]
    pub course: CourseView,
    pub relevance: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub beginner: Vec<RoadmapCourse>,
    pub intermediate: Vec<RoadmapCourse>,
    pub advanced: Vec<RoadmapCourse>,
}

/// Response of `POST /api/v1/recommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub greeting: String,
    pub recommendations: Vec<RecommendedCourse>,
    pub roadmap: RoadmapResponse,
}

/// Closed vocabularies the client may choose from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub types: Vec<String>,
    pub levels: Vec<String>,
}
