pub mod link_preview;
pub mod recommendations;

pub use link_preview::{HttpLinkPreviewer, LinkPreviewer};
pub use recommendations::{RecommendationService, RecommendationSettings};
