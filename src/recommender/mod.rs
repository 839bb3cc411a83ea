//! Course recommendation core
//!
//! Everything here is pure computation over a [`TrainedModel`] that is fitted
//! once by the `train` binary, persisted as a single artifact, and shared
//! read-only by every request afterwards.

pub mod artifact;
pub mod dataset;
pub mod encoder;
pub mod index;
pub mod roadmap;
pub mod scorer;
pub mod stopwords;
pub mod tfidf;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::Course;

pub use encoder::{FeatureEncoder, FeatureVector};
pub use index::{Neighbor, SimilarityIndex};
pub use roadmap::{Roadmap, RoadmapSelector, DEFAULT_COURSES_PER_LEVEL};
pub use scorer::{score, score_courses, ScoredCourse, SkillWeights};
pub use tfidf::DEFAULT_MAX_FEATURES;

pub const DEFAULT_NEIGHBORS: usize = 5;

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    pub max_features: usize,
    pub neighbors: usize,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

/// A query as entered by the user
#[derive(Debug, Clone, PartialEq)]
pub struct CourseQuery<'q> {
    pub skills: &'q str,
    pub course_type: &'q str,
    pub level: &'q str,
}

/// A nearest-neighbor match resolved to its course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub course: &'a Course,
    pub distance: f64,
}

/// Both ranked outputs for one query
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub matches: Vec<Match<'a>>,
    pub roadmap: Roadmap<'a>,
}

/// Fitted encoder, course table and similarity index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    encoder: FeatureEncoder,
    courses: Vec<Course>,
    index: SimilarityIndex,
    neighbors: usize,
}

impl TrainedModel {
    /// Fits the model on a catalog. An empty catalog is `InsufficientData`.
    pub fn train(courses: Vec<Course>, options: TrainingOptions) -> AppResult<Self> {
        if courses.is_empty() {
            return Err(AppError::InsufficientData(
                "cannot train on an empty course catalog".to_string(),
            ));
        }

        let encoder = FeatureEncoder::fit(&courses, options.max_features);
        let rows = courses
            .iter()
            .map(|course| encoder.encode_course(course))
            .collect::<AppResult<Vec<_>>>()?;
        let index = SimilarityIndex::build(rows);

        tracing::info!(
            courses = courses.len(),
            vocabulary_size = encoder.skills().vocabulary_size(),
            types = ?encoder.types().classes(),
            levels = ?encoder.levels().classes(),
            "Trained recommendation model"
        );

        Ok(Self {
            encoder,
            courses,
            index,
            neighbors: options.neighbors,
        })
    }

    /// Courses closest to the query's feature vector, at most `k` of them
    pub fn nearest(&self, query: &CourseQuery<'_>, k: usize) -> AppResult<Vec<Match<'_>>> {
        let features = self
            .encoder
            .encode(query.skills, query.course_type, query.level)?;

        Ok(self
            .index
            .nearest(&features, k)
            .into_iter()
            .map(|neighbor| Match {
                course: &self.courses[neighbor.position],
                distance: neighbor.distance,
            })
            .collect())
    }

    /// Roadmap for a user's ordered skills; never touches the course table
    pub fn roadmap(&self, skills_text: &str, per_level: usize) -> Roadmap<'_> {
        let weights = SkillWeights::from_text(skills_text);
        RoadmapSelector::new(per_level).select(score_courses(&weights, &self.courses))
    }

    /// Primary list plus roadmap
    pub fn recommend(
        &self,
        query: &CourseQuery<'_>,
        limit: usize,
        per_level: usize,
    ) -> AppResult<Recommendation<'_>> {
        let matches = self.nearest(query, limit)?;
        let roadmap = self.roadmap(query.skills, per_level);
        Ok(Recommendation { matches, roadmap })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Neighbor count the model was trained with, the default list length
    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    pub fn types(&self) -> &[String] {
        self.encoder.types().classes()
    }

    pub fn levels(&self) -> &[String] {
        self.encoder.levels().classes()
    }
}
