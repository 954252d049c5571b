//! Unified error handling
//!
//! Application error enum and response structure.
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E1xxx | account state | E1004 account disabled |
//! | E2xxx | authorization | E2001 forbidden |
//! | E3xxx | auth tokens | E3002 invalid token |
//! | E4xxx | quota ledger | E4001 quota exhausted |
//! | E8xxx | AI collaborator | E8001 malformed response |
//! | E9xxx | system | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code ("E0000" means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // ========== Authorization / account state (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Account disabled")]
    AccountDisabled,

    // ========== Business logic (4xx) ==========
    #[error("Member not found: {0}")]
    MemberNotFound(i64),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== Quota ledger (422) ==========
    #[error("Monthly unlock credit limit reached")]
    QuotaExhausted,

    // ========== AI collaborator (5xx) ==========
    #[error("AI response malformed: {0}")]
    MalformedAiResponse(String),

    #[error("AI request timed out")]
    AiTimeout,

    #[error("AI request failed: {0}")]
    AiUnavailable(String),

    // ========== System (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string()),

            // Authorization (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),
            AppError::AccountDisabled => (
                StatusCode::FORBIDDEN,
                "E1004",
                "Your account has been disabled. Contact an administrator.".to_string(),
            ),

            // Not found (404)
            AppError::MemberNotFound(id) => {
                (StatusCode::NOT_FOUND, "E0103", format!("Member {} not found", id))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.clone()),

            // Quota (422)
            AppError::QuotaExhausted => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "E4001",
                "You have used all unlock credits for this month".to_string(),
            ),

            // AI collaborator (5xx)
            AppError::MalformedAiResponse(msg) => {
                error!(target: "ai", error = %msg, "Malformed AI response");
                (
                    StatusCode::BAD_GATEWAY,
                    "E8001",
                    "AI service returned an unexpected format".to_string(),
                )
            }
            AppError::AiTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "E8002",
                "AI service did not respond in time".to_string(),
            ),
            AppError::AiUnavailable(msg) => {
                error!(target: "ai", error = %msg, "AI request failed");
                (StatusCode::BAD_GATEWAY, "E8003", "AI service unavailable".to_string())
            }

            // Database (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error".to_string())
            }

            // Internal (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

// ========== Helper constructors ==========

impl AppError {
    /// Invalid credentials with unified message
    /// (prevents email enumeration during login)
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
