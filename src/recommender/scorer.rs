use std::collections::HashMap;

use crate::models::{split_skills, Course};

/// Positional weights of the skills a user listed
///
/// With `n` listed skills the i-th one (0-indexed) weighs `n - i`. When a
/// skill is listed twice, its last occurrence sets the weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillWeights {
    weights: HashMap<String, u64>,
}

impl SkillWeights {
    /// Parses comma-separated free text; empty tokens are ignored
    pub fn from_text(skills_text: &str) -> Self {
        Self::from_skills(&split_skills(&skills_text.to_lowercase()))
    }

    pub fn from_skills<S: AsRef<str>>(skills: &[S]) -> Self {
        let tokens: Vec<String> = skills
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let count = tokens.len() as u64;

        let mut weights = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.into_iter().enumerate() {
            weights.insert(token, count - i as u64);
        }
        Self { weights }
    }

    pub fn weight(&self, skill: &str) -> u64 {
        self.weights.get(skill).copied().unwrap_or(0)
    }

    /// Sum of the weights of every course skill the user listed (exact match only)
    pub fn score<S: AsRef<str>>(&self, course_skills: &[S]) -> u64 {
        course_skills
            .iter()
            .map(|skill| self.weight(skill.as_ref()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Relevance of a course's skill list to an ordered list of user skills
pub fn score<U: AsRef<str>, C: AsRef<str>>(user_skills: &[U], course_skills: &[C]) -> u64 {
    SkillWeights::from_skills(user_skills).score(course_skills)
}

/// A catalog course paired with its relevance for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCourse<'a> {
    pub position: usize,
    pub course: &'a Course,
    pub relevance: u64,
}

/// Scores every course into a fresh list, in catalog order
pub fn score_courses<'a>(weights: &SkillWeights, courses: &'a [Course]) -> Vec<ScoredCourse<'a>> {
    courses
        .iter()
        .enumerate()
        .map(|(position, course)| ScoredCourse {
            position,
            course,
            relevance: weights.score(&course.skills_covered),
        })
        .collect()
}
