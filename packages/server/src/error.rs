use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::models::contact::FieldError;
use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure, except rate limiting.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `SERVICE_UNAVAILABLE`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Please correct the highlighted fields and try again")]
    pub message: String,
    /// Per-field problems, present on validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Internal detail, only exposed in development mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Body of a 429 response.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitBody {
    #[schema(example = "Too many requests, please try again later.")]
    pub error: String,
    /// Seconds until the client may retry.
    #[schema(example = 120)]
    pub retry_after: u64,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    NotFound(String),
    /// Rate limit exceeded. Contains seconds until retry is allowed.
    RateLimited {
        retry_after: u64,
    },
    ServiceUnavailable(String),
    /// Unexpected failure. Logged; the client only sees a generic message.
    Internal(String),
    /// Failure with a caller-facing message. `detail` is included only when `reveal` is set.
    Failed {
        message: String,
        detail: String,
        reveal: bool,
    },
}

impl AppError {
    /// Request-level validation problem with no field breakdown.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    fn body(code: &'static str, message: String) -> ErrorBody {
        ErrorBody {
            success: false,
            code,
            message,
            errors: None,
            detail: None,
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    errors: Some(errors),
                    ..Self::body("VALIDATION_ERROR", message)
                },
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Self::body("NOT_FOUND", msg)),
            AppError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                Self::body(
                    "RATE_LIMITED",
                    format!("Rate limit exceeded. Try again in {retry_after} seconds"),
                ),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Self::body("SERVICE_UNAVAILABLE", msg),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Self::body("INTERNAL_ERROR", "An unexpected error occurred".into()),
                )
            }
            AppError::Failed {
                message,
                detail,
                reveal,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    detail: reveal.then_some(detail),
                    ..Self::body("INTERNAL_ERROR", message)
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::RateLimited { retry_after } = self {
            let body = RateLimitBody {
                error: "Too many requests, please try again later.".into(),
                retry_after,
            };
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(body),
            )
                .into_response();
        }

        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => {
                AppError::ServiceUnavailable("The database is currently unavailable".into())
            }
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        StoreError::from(err).into()
    }
}
