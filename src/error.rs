use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Unknown {field} '{value}': not present in the trained vocabulary")]
    UnknownCategory { field: &'static str, value: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model artifact error: {0}")]
    ModelArtifact(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<bincode::Error> for AppError {
    fn from(err: bincode::Error) -> Self {
        AppError::ModelArtifact(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownCategory { .. } | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Dataset(_)
            | AppError::Io(_)
            | AppError::ModelArtifact(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_message_names_field_and_value() {
        let err = AppError::UnknownCategory {
            field: "type",
            value: "quantum-computing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown type 'quantum-computing': not present in the trained vocabulary"
        );
    }

    #[test]
    fn test_status_codes() {
        let unknown = AppError::UnknownCategory {
            field: "level",
            value: "expert".to_string(),
        };
        assert_eq!(unknown.into_response().status(), StatusCode::BAD_REQUEST);

        let insufficient = AppError::InsufficientData("empty corpus".to_string());
        assert_eq!(
            insufficient.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let missing = AppError::NotFound("course".to_string());
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let artifact = AppError::ModelArtifact("bad version".to_string());
        assert_eq!(
            artifact.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
