use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No Title Available";
pub const NO_DESCRIPTION: &str = "No Description Available";

/// Title and meta description scraped from a course page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: String,
    pub fetched_at: DateTime<Utc>,
}

impl LinkPreview {
    /// Builds a preview, substituting the sentinel text for any missing part
    pub fn new(url: impl Into<String>, title: Option<String>, description: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            fetched_at: Utc::now(),
        }
    }

    /// Sentinel preview used whenever a fetch fails
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self::new(url, None, None)
    }

    pub fn is_unavailable(&self) -> bool {
        self.title == NO_TITLE && self.description == NO_DESCRIPTION
    }
}
