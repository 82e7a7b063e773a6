//! Error handling - HTML error pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use thiserror::Error;

use narrative_core::domain::Viewer;
use narrative_core::error::{DomainError, RepoError};

use crate::templates::{self, RenderError};
use crate::views::ErrorContext;

/// Application-level error type rendered as an HTML page.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing record, hidden record, or a page the viewer may not know about.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let context = match self {
            AppError::NotFound(detail) => {
                tracing::debug!("Not found: {}", detail);
                ErrorContext {
                    status: 404,
                    reason: "Not Found",
                    message: "The page you were looking for does not exist.",
                }
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorContext {
                    status: 500,
                    reason: "Server Error",
                    message: "Something went wrong on our side. Please try again later.",
                }
            }
        };

        let body = templates::render_page(
            templates::ERROR,
            context.reason,
            &Viewer::Anonymous,
            &context,
        )
        .unwrap_or_else(|e| {
            tracing::error!("Failed to render error page: {}", e);
            format!("{} {}", context.status, context.reason)
        });

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Store(e) => e.into(),
            // Handlers consume validation failures themselves; reaching here is a bug.
            DomainError::Validation(errors) => {
                AppError::Internal(format!("Unhandled validation failure: {errors}"))
            }
            DomainError::Duplicate(msg) | DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {msg}"))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {msg}")),
            RepoError::Constraint(msg) => {
                AppError::Internal(format!("Database constraint violation: {msg}"))
            }
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Internal(format!("Template rendering failed: {err}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
