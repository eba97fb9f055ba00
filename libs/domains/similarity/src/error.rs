use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// The embedding service could not be reached or did not answer in time.
    #[error("Embedding service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The embedding service answered, but with nothing usable.
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SimilarityResult<T> = Result<T, SimilarityError>;

impl SimilarityError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SimilarityError::UpstreamUnavailable(_))
    }
}

impl From<ValidationErrors> for SimilarityError {
    fn from(err: ValidationErrors) -> Self {
        SimilarityError::Validation(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for SimilarityError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        SimilarityError::IndexUnavailable(err.to_string())
    }
}

/// Connect failures and timeouts mean the server is out of reach; anything
/// else means it answered badly.
impl From<reqwest::Error> for SimilarityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            SimilarityError::UpstreamUnavailable(err.to_string())
        } else {
            SimilarityError::Embedding(err.to_string())
        }
    }
}

impl From<core_config::ConfigError> for SimilarityError {
    fn from(err: core_config::ConfigError) -> Self {
        SimilarityError::Config(err.to_string())
    }
}

/// Convert SimilarityError to AppError for standardized HTTP error responses
impl From<SimilarityError> for AppError {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::Validation(msg) => AppError::BadRequest(msg),
            SimilarityError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            SimilarityError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
            SimilarityError::Embedding(msg) => AppError::Embedding(msg),
            SimilarityError::IndexUnavailable(msg) => AppError::IndexUnavailable(msg),
            SimilarityError::Config(msg) => AppError::Config(msg),
        }
    }
}

impl IntoResponse for SimilarityError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_only_upstream_unavailable_is_transient() {
        assert!(SimilarityError::UpstreamUnavailable("refused".into()).is_transient());
        assert!(!SimilarityError::Embedding("empty".into()).is_transient());
        assert!(!SimilarityError::IndexUnavailable("down".into()).is_transient());
        assert!(!SimilarityError::Validation("name".into()).is_transient());
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (SimilarityError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (SimilarityError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                SimilarityError::UpstreamUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SimilarityError::Embedding("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SimilarityError::IndexUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SimilarityError::Config("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
