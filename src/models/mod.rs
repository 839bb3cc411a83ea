mod course;
mod preview;
mod recommendation;

pub use course::{split_skills, Course, Level};
pub use preview::{LinkPreview, NO_DESCRIPTION, NO_TITLE};
pub use recommendation::{
    CourseView, OptionsResponse, RecommendationRequest, RecommendationResponse,
    RecommendedCourse, RoadmapCourse, RoadmapResponse,
};
