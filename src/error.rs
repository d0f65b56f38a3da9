use actix_web::{HttpResponse, http::StatusCode};

/// Stable error taxonomy for every user-visible failure. Each variant maps to
/// one wire-level kind so callers can branch on `error` without parsing the
/// message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} with txHash {tx_hash} already exists")]
    DuplicateKey {
        entity: &'static str,
        tx_hash: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("external dependency failure: {0}")]
    ExternalDependency(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::DuplicateKey { .. } => "duplicate_key",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::ExternalDependency(_) => "external_dependency",
            AppError::Database(_) => "database_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateKey { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalDependency(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, AppError::Database(_)) {
            log::error!("request failed: {self}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
