use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Fixed message for requests lacking valid credentials.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Authentication credentials were not provided.";

/// Fixed message for authenticated requesters who do not own the resource.
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to access this page.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 403 with code `not_authenticated`: no valid session was presented.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 403 with code `permission_denied`: the requester is authenticated
    /// but is not the owner addressed by the URL.
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 with one detail per failed field, each carrying a machine code.
    #[error("Validation failed")]
    Validation(Vec<ValidationDetail>),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

/// One field-scoped validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Builds a single field-scoped validation error.
    pub fn field(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ApiError::Validation(vec![ValidationDetail {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::NotAuthenticated => (
                StatusCode::FORBIDDEN,
                "not_authenticated",
                NOT_AUTHENTICATED_MESSAGE.to_string(),
                None,
            ),
            ApiError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                "permission_denied",
                PERMISSION_DENIED_MESSAGE.to_string(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation(details) => {
                let message = if details.len() == 1 {
                    details[0].message.clone()
                } else {
                    format!("{} validation errors", details.len())
                };
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    message,
                    Some(details),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // Unique-constraint backstop behind the
                        // application-level uniqueness checks
                        "23505" => ApiError::field(
                            "name",
                            "unique_name",
                            "A resource with this name already exists.",
                        ),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

impl From<shared::password::PasswordError> for ApiError {
    fn from(err: shared::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_authenticated_is_403() {
        let response = ApiError::NotAuthenticated.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_permission_denied_is_403() {
        let response = ApiError::PermissionDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_is_404() {
        let response = ApiError::NotFound("missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_field_validation_is_400() {
        let error = ApiError::field("name", "unique_name", "already exists");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_is_500() {
        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_field_helper_carries_code() {
        match ApiError::field("password", "wrong_password", "The password is incorrect") {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "password");
                assert_eq!(details[0].code, "wrong_password");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_from_validator_errors_keeps_codes() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "Username is required"))]
            username: String,
        }

        let probe = Probe {
            username: String::new(),
        };
        let error: ApiError = probe.validate().unwrap_err().into();
        match error {
            ApiError::Validation(details) => {
                assert_eq!(details[0].field, "username");
                assert_eq!(details[0].code, "length");
                assert_eq!(details[0].message, "Username is required");
            }
            _ => panic!("Expected Validation error"),
        }
    }
}
