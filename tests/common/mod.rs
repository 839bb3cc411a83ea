use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use saarthi_api::{
    models::LinkPreview,
    recommender::{dataset::load_courses, TrainedModel, TrainingOptions},
    services::{LinkPreviewer, RecommendationService, RecommendationSettings},
};

pub const SAMPLE_CATALOG: &str = include_str!("../../data/courses_sample.csv");

pub fn sample_model() -> TrainedModel {
    let courses = load_courses(SAMPLE_CATALOG.as_bytes()).unwrap();
    TrainedModel::train(courses, TrainingOptions::default()).unwrap()
}

/// Previewer that answers from the URL alone, or fails for every URL
pub struct StubPreviewer {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubPreviewer {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl LinkPreviewer for StubPreviewer {
    async fn preview(&self, url: &str) -> LinkPreview {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            LinkPreview::unavailable(url)
        } else {
            LinkPreview::new(
                url,
                Some(format!("Title of {}", url)),
                Some("A course page".to_string()),
            )
        }
    }
}

#[allow(dead_code)]
pub fn sample_service(previewer: Arc<StubPreviewer>) -> RecommendationService {
    RecommendationService::new(
        Arc::new(sample_model()),
        previewer,
        RecommendationSettings::default(),
    )
}
