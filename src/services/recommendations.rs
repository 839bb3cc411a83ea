use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::AppResult,
    models::{
        CourseView, LinkPreview, RecommendationRequest, RecommendationResponse,
        RecommendedCourse, RoadmapCourse, RoadmapResponse,
    },
    recommender::{CourseQuery, Recommendation, ScoredCourse, TrainedModel},
    services::link_preview::LinkPreviewer,
};

/// Request-independent knobs of the recommendation surface
#[derive(Debug, Clone, Copy)]
pub struct RecommendationSettings {
    /// Hard cap on the primary list
    pub max_recommendations: usize,
    pub courses_per_level: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_recommendations: 10,
            courses_per_level: crate::recommender::DEFAULT_COURSES_PER_LEVEL,
        }
    }
}

/// Generates course recommendations and a learning roadmap
///
/// Both ranked lists are computed from the shared read-only model first.
/// Link previews are attached afterwards and can only ever add information.
pub struct RecommendationService {
    model: Arc<TrainedModel>,
    previewer: Arc<dyn LinkPreviewer>,
    settings: RecommendationSettings,
}

impl RecommendationService {
    pub fn new(
        model: Arc<TrainedModel>,
        previewer: Arc<dyn LinkPreviewer>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            model,
            previewer,
            settings,
        }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn previewer(&self) -> Arc<dyn LinkPreviewer> {
        self.previewer.clone()
    }

    /// Primary list length: the requested limit, or the trained neighbor count, capped
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or_else(|| self.model.neighbors())
            .min(self.settings.max_recommendations)
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendationResponse> {
        let start = Instant::now();
        let limit = self.effective_limit(request.limit);

        let query = CourseQuery {
            skills: &request.skills,
            course_type: &request.course_type,
            level: &request.level,
        };
        let recommendation = self
            .model
            .recommend(&query, limit, self.settings.courses_per_level)?;
        let mut response = build_response(&request.name, &recommendation);

        tracing::info!(
            limit,
            matches = response.recommendations.len(),
            beginner = response.roadmap.beginner.len(),
            intermediate = response.roadmap.intermediate.len(),
            advanced = response.roadmap.advanced.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Ranked courses"
        );

        if request.include_previews {
            let previews = self.fetch_previews(response_urls(&response)).await;
            attach_previews(&mut response, &previews);
        }

        Ok(response)
    }

    /// One task per distinct URL; a failed task falls back to the sentinel preview
    async fn fetch_previews(&self, urls: Vec<String>) -> HashMap<String, LinkPreview> {
        let mut tasks = Vec::with_capacity(urls.len());
        for url in urls {
            let previewer = self.previewer.clone();
            let task_url = url.clone();
            let task = tokio::spawn(async move { previewer.preview(&task_url).await });
            tasks.push((url, task));
        }

        let mut previews = HashMap::with_capacity(tasks.len());
        let mut failures = 0usize;
        for (url, task) in tasks {
            let preview = match task.await {
                Ok(preview) => preview,
                Err(e) => {
                    tracing::error!(error = %e, url = %url, "Preview task failed");
                    LinkPreview::unavailable(url.as_str())
                }
            };
            if preview.is_unavailable() {
                failures += 1;
            }
            previews.insert(url, preview);
        }

        if failures > 0 {
            tracing::warn!(
                total = previews.len(),
                unavailable = failures,
                "Some link previews are unavailable"
            );
        }

        previews
    }
}

fn build_response(name: &str, recommendation: &Recommendation<'_>) -> RecommendationResponse {
    let recommendations = recommendation
        .matches
        .iter()
        .map(|m| RecommendedCourse {
            course: CourseView::from(m.course),
            distance: m.distance,
        })
        .collect();

    let roadmap_level = |entries: &[ScoredCourse<'_>]| -> Vec<RoadmapCourse> {
        entries
            .iter()
            .map(|entry| RoadmapCourse {
                course: CourseView::from(entry.course),
                relevance: entry.relevance,
            })
            .collect()
    };

    RecommendationResponse {
        greeting: greeting(name),
        recommendations,
        roadmap: RoadmapResponse {
            beginner: roadmap_level(&recommendation.roadmap.beginner),
            intermediate: roadmap_level(&recommendation.roadmap.intermediate),
            advanced: roadmap_level(&recommendation.roadmap.advanced),
        },
    }
}

fn greeting(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "These are the courses tailored just for you".to_string()
    } else {
        format!("Hi {}, these are the courses tailored just for you", name)
    }
}

fn course_views_mut(response: &mut RecommendationResponse) -> impl Iterator<Item = &mut CourseView> {
    let RecommendationResponse {
        recommendations,
        roadmap,
        ..
    } = response;
    recommendations
        .iter_mut()
        .map(|r| &mut r.course)
        .chain(
            roadmap
                .beginner
                .iter_mut()
                .chain(roadmap.intermediate.iter_mut())
                .chain(roadmap.advanced.iter_mut())
                .map(|r| &mut r.course),
        )
}

/// Distinct non-empty URLs in response order
fn response_urls(response: &RecommendationResponse) -> Vec<String> {
    let roadmap = &response.roadmap;
    let mut urls: Vec<String> = Vec::new();
    let all = response
        .recommendations
        .iter()
        .map(|r| &r.course)
        .chain(
            roadmap
                .beginner
                .iter()
                .chain(&roadmap.intermediate)
                .chain(&roadmap.advanced)
                .map(|r| &r.course),
        );
    for course in all {
        if !course.url.trim().is_empty() && !urls.contains(&course.url) {
            urls.push(course.url.clone());
        }
    }
    urls
}

fn attach_previews(response: &mut RecommendationResponse, previews: &HashMap<String, LinkPreview>) {
    for course in course_views_mut(response) {
        if let Some(preview) = previews.get(&course.url) {
            course.preview = Some(preview.clone());
        }
    }
}
