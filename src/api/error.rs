use std::fmt;

use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;
use crate::pipeline::PipelineError;

/// Service-level errors shared by the job and submission services.
///
/// The failed job-activation side effect is deliberately not represented
/// here: it never fails the primary transition and is reported as a
/// `warning` field on the success response instead.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence call failed. Propagated unmodified; no retry.
    DatabaseError(sqlx::Error),

    /// Malformed or missing required input. No mutation occurred.
    ValidationError(String),

    /// Requested stage is not reachable from the current stage.
    InvalidTransition { from: String, to: String },

    /// Referenced record does not resolve, or sits outside the caller's
    /// visible set (scoped reads hide rather than reveal existence).
    NotFound(String),

    /// The caller's role may not perform this action.
    Forbidden(String),

    /// Credentials did not match any account.
    Unauthorized(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        ServiceError::NotFound(format!("{entity} {id} not found"))
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {e}"),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            ServiceError::InvalidTransition { from, to } => {
                write!(f, "Invalid transition from '{from}' to '{to}'")
            }
            ServiceError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::DatabaseError(err)
    }
}

impl From<PipelineError> for ServiceError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidTransition { from, to } => ServiceError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            PipelineError::InvalidJobTransition { from, to } => ServiceError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            PipelineError::Validation(msg) => ServiceError::ValidationError(msg),
        }
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::InvalidTransition { from, to } => {
                warn!("Invalid transition requested: {} -> {}", from, to);
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Invalid transition".to_string(),
                    fields: serde_json::json!({"from": from, "to": to}),
                })
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::Forbidden(msg) => {
                warn!("Forbidden: {}", msg);
                HttpResponse::Forbidden().json(ErrorResponse {
                    error: "Forbidden".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::Unauthorized(msg) => {
                warn!("Unauthorized: {}", msg);
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
        }
    }
}
