use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("{0}")]
    Server(String),
}

impl AppError {
    /// Normalize an error at a service boundary.
    ///
    /// Validation and not-found errors are expected outcomes and pass through
    /// untouched. Anything else is logged in full and becomes a `Server` error
    /// carrying the context and the client-safe summary of the original.
    pub fn into_server(self, context: &str) -> Self {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) => self,
            other => {
                tracing::error!(context, "{:?}", other);
                AppError::Server(format!("{}: {}", context, other.client_message()))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Pool(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The text a client may see. Database and pool details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Server(msg) => {
                msg.clone()
            }
            AppError::Database(_) => "Database error".to_string(),
            AppError::Pool(_) => "Database connection error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Pool(e) => tracing::error!("Pool error: {:?}", e),
            AppError::Server(msg) => tracing::error!("Server error: {}", msg),
            AppError::Validation(_) | AppError::NotFound(_) => {}
        }

        let body = Json(json!({ "error": self.client_message() }));
        (self.status(), body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
