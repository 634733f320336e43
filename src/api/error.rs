//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::{DatabaseError, StoreError};
use crate::recovery::RecoveryError;
use crate::validation::ValidationError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Profile has not been set up")]
    NoProfile,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NoProfile => (
                StatusCode::NOT_FOUND,
                "NO_PROFILE",
                "Profile has not been set up yet".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
        };

        let body = ErrorBody {
            success: false,
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => e.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, .. } if entity_type == "Profile" => {
                ApiError::NoProfile
            }
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} not found: {id}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<RecoveryError> for ApiError {
    fn from(err: RecoveryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => e.into(),
            StoreError::Database(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Symptom not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn no_profile_returns_404_with_code() {
        let response = ApiError::NoProfile.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NO_PROFILE");
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn validation_error_returns_400_with_message() {
        let api_err: ApiError = ValidationError::PainLevelOutOfRange(11).into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(
            json["error"]["message"],
            "Pain level must be between 0 and 10 (got 11)"
        );
    }

    #[test]
    fn database_not_found_maps_to_404() {
        let api_err: ApiError = DatabaseError::not_found("Symptom", "abc").into();
        assert!(matches!(api_err, ApiError::NotFound(_)));

        let api_err: ApiError = DatabaseError::not_found("Profile", "1").into();
        assert!(matches!(api_err, ApiError::NoProfile));
    }

    #[test]
    fn database_failure_maps_to_internal() {
        let api_err: ApiError = DatabaseError::Corpus("bad json".into()).into();
        assert!(matches!(api_err, ApiError::Internal(_)));

        let api_err: ApiError = CoreError::LockPoisoned.into();
        assert!(matches!(api_err, ApiError::Internal(_)));
    }

    #[test]
    fn recovery_error_maps_to_bad_request() {
        let api_err: ApiError = RecoveryError::InvalidSurgeryDate("soon".into()).into();
        assert!(matches!(api_err, ApiError::BadRequest(_)));
    }

    #[test]
    fn store_error_dispatches() {
        let api_err: ApiError = StoreError::Validation(ValidationError::InvalidEmail).into();
        assert!(matches!(api_err, ApiError::BadRequest(_)));
        let api_err: ApiError =
            StoreError::Database(DatabaseError::not_found("Symptom", "x")).into();
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }
}
