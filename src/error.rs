use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create a new validation error
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new not found error
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new conflict error
    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a new internal error
    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(msg.into())
    }
}

/// SQLSTATE classes the storage layer raises for data problems.
///
/// 23503 (foreign key) and 23505 (unique) are caller conflicts; 22001
/// (value too long), 23502 (not null) and 23514 (check) are bad input.
/// Anything else stays a generic database failure.
fn classify_sqlstate(code: &str, message: &str) -> Option<ApiError> {
    match code {
        "23503" | "23505" => Some(ApiError::Conflict(message.to_string())),
        "22001" | "23502" | "23514" => Some(ApiError::Validation(message.to_string())),
        _ => None,
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(code) = db_err.code() {
                if let Some(classified) = classify_sqlstate(&code, db_err.message()) {
                    return classified;
                }
            }
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, error_message, error_code) = match self {
            ApiError::Database(ref err) => {
                tracing::error!(
                    error_id = %error_id,
                    error = %err,
                    "database error occurred"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::Validation(ref msg) => {
                tracing::warn!(
                    error_id = %error_id,
                    error = %msg,
                    "validation error occurred"
                );
                (StatusCode::BAD_REQUEST, msg.clone(), "VALIDATION_ERROR")
            }
            ApiError::NotFound(ref msg) => {
                tracing::info!(
                    error_id = %error_id,
                    error = %msg,
                    "resource not found"
                );
                (StatusCode::NOT_FOUND, msg.clone(), "NOT_FOUND")
            }
            ApiError::Conflict(ref msg) => {
                tracing::warn!(
                    error_id = %error_id,
                    error = %msg,
                    "conflict error occurred"
                );
                (StatusCode::CONFLICT, msg.clone(), "CONFLICT_ERROR")
            }
            ApiError::Config(ref err) => {
                tracing::error!(
                    error_id = %error_id,
                    error = %err,
                    "configuration error occurred"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                    "CONFIG_ERROR",
                )
            }
            ApiError::Migration(ref err) => {
                tracing::error!(
                    error_id = %error_id,
                    error = %err,
                    "database migration error occurred"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database migration error".to_string(),
                    "MIGRATION_ERROR",
                )
            }
            ApiError::Internal(ref msg) => {
                tracing::error!(
                    error_id = %error_id,
                    error = %msg,
                    "internal server error occurred"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg.clone(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": error_code,
                "error_id": error_id,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn test_validation_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::validation("Test validation error"))
    }

    async fn test_not_found_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::not_found("Resource not found"))
    }

    async fn test_conflict_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::conflict("Row still referenced"))
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let app = Router::new().route("/test", get(test_validation_handler));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_error_response() {
        let app = Router::new().route("/test", get(test_not_found_handler));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_conflict_error_response() {
        let app = Router::new().route("/test", get(test_conflict_handler));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_foreign_key_violation_classified_as_conflict() {
        let err = classify_sqlstate("23503", "delete violates foreign key").unwrap();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_unique_violation_classified_as_conflict() {
        let err = classify_sqlstate("23505", "duplicate key value").unwrap();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_length_violation_classified_as_validation() {
        let err = classify_sqlstate("22001", "value too long for type").unwrap();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = classify_sqlstate("23502", "null value in column").unwrap();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_sqlstate_not_classified() {
        assert!(classify_sqlstate("57014", "query canceled").is_none());
    }

    #[test]
    fn test_error_constructors() {
        let validation_err = ApiError::validation("test");
        assert!(matches!(validation_err, ApiError::Validation(_)));

        let not_found_err = ApiError::not_found("test");
        assert!(matches!(not_found_err, ApiError::NotFound(_)));

        let conflict_err = ApiError::conflict("test");
        assert!(matches!(conflict_err, ApiError::Conflict(_)));

        let internal_err = ApiError::internal("test");
        assert!(matches!(internal_err, ApiError::Internal(_)));
    }
}
