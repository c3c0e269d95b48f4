//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                      | Key Methods         |
// |-----------------|--------------------------------------------------|---------------------|
// | ApiError        | Error types for the API                          | from, into_response |
//--------------------------------------------------------------------------------------------------

use axum::{
    response::{Response, IntoResponse},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::services::match_lifecycle::LifecycleError;
use crate::outbounds::record_store::RecordStoreError;

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// API-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested resource was not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request was invalid
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The record store could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(_) | LifecycleError::MissingRequiredField(_) => {
                Self::BadRequest(err.to_string())
            }
            LifecycleError::UnknownMatch(_) => Self::NotFound(err.to_string()),
            LifecycleError::Lookup(inner) => inner.into(),
        }
    }
}

impl From<RecordStoreError> for ApiError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            RecordStoreError::Unavailable(_) => Self::Unavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::{EventKind, EventValidationError, ValidationError};
    use uuid::Uuid;

    #[test]
    fn test_lifecycle_error_mapping() {
        let missing = LifecycleError::MissingRequiredField(EventValidationError::MissingRequiredField {
            kind: EventKind::Substitution,
            field: "sub_out",
        });
        assert!(matches!(ApiError::from(missing), ApiError::BadRequest(_)));

        let negative = LifecycleError::Validation(ValidationError::NegativeMinute(-1));
        assert!(matches!(ApiError::from(negative), ApiError::BadRequest(_)));

        let unknown = LifecycleError::UnknownMatch(Uuid::new_v4());
        assert!(matches!(ApiError::from(unknown), ApiError::NotFound(_)));

        let down = LifecycleError::Lookup(RecordStoreError::Unavailable("down".to_string()));
        assert_eq!(
            ApiError::from(down),
            ApiError::Unavailable("Record store unavailable: down".to_string())
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unavailable("x".to_string()).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
