use super::scorer::ScoredCourse;
use crate::models::Level;

pub const DEFAULT_COURSES_PER_LEVEL: usize = 2;

/// Highest-relevance courses per difficulty tier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roadmap<'a> {
    pub beginner: Vec<ScoredCourse<'a>>,
    pub intermediate: Vec<ScoredCourse<'a>>,
    pub advanced: Vec<ScoredCourse<'a>>,
}

impl<'a> Roadmap<'a> {
    pub fn level(&self, level: Level) -> &[ScoredCourse<'a>] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    fn level_mut(&mut self, level: Level) -> &mut Vec<ScoredCourse<'a>> {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Advanced => &mut self.advanced,
        }
    }
}

/// Buckets scored courses by level and keeps the top few of each
#[derive(Debug, Clone, Copy)]
pub struct RoadmapSelector {
    per_level: usize,
}

impl Default for RoadmapSelector {
    fn default() -> Self {
        Self::new(DEFAULT_COURSES_PER_LEVEL)
    }
}

impl RoadmapSelector {
    pub fn new(per_level: usize) -> Self {
        Self { per_level }
    }

    /// Sorts by relevance (descending, catalog order on ties) and fills each tier.
    /// Courses whose level is not a known tier are left out.
    pub fn select<'a>(&self, mut scored: Vec<ScoredCourse<'a>>) -> Roadmap<'a> {
        scored.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then_with(|| a.position.cmp(&b.position))
        });

        let mut roadmap = Roadmap::default();
        for entry in scored {
            let Some(level) = entry.course.tier() else {
                continue;
            };
            let bucket = roadmap.level_mut(level);
            if bucket.len() < self.per_level {
                bucket.push(entry);
            }
        }
        roadmap
    }
}
