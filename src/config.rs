use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the trained model artifact produced by the `train` binary
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Redis connection URL for the link preview cache (previews are uncached when unset)
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for a single link preview fetch, in seconds
    #[serde(default = "default_preview_timeout_secs")]
    pub preview_timeout_secs: u64,

    /// How long a fetched preview stays in Redis, in seconds
    #[serde(default = "default_preview_cache_ttl_secs")]
    pub preview_cache_ttl_secs: u64,

    /// Maximum length of the primary recommendation list
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Number of courses kept in each roadmap level
    #[serde(default = "default_roadmap_courses_per_level")]
    pub roadmap_courses_per_level: usize,
}

fn default_model_path() -> String {
    "model.bin".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_preview_timeout_secs() -> u64 {
    5
}

fn default_preview_cache_ttl_secs() -> u64 {
    86_400 // 1 day
}

fn default_max_recommendations() -> usize {
    10
}

fn default_roadmap_courses_per_level() -> usize {
    2
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn preview_timeout(&self) -> Duration {
        Duration::from_secs(self.preview_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.model_path, "model.bin");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.preview_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_recommendations, 10);
        assert_eq!(config.roadmap_courses_per_level, 2);
    }

    #[test]
    fn test_overrides_from_env_pairs() {
        let vars = vec![
            ("MODEL_PATH".to_string(), "/srv/model.bin".to_string()),
            ("REDIS_URL".to_string(), "redis://cache:6379".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("ROADMAP_COURSES_PER_LEVEL".to_string(), "3".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.model_path, "/srv/model.bin");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.roadmap_courses_per_level, 3);
    }
}
