use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Error taxonomy for every lifecycle-mutating operation.
///
/// Notification dispatch failures are deliberately absent: they are
/// best-effort, logged in the notify module, and never surface to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("cannot {action} a job in status {status}")]
    InvalidTransition {
        action: &'static str,
        status: &'static str,
    },

    #[error("access denied")]
    AccessDenied,

    #[error("hauler setup incomplete")]
    HaulerSetupRequired,

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    pub fn invalid_transition(action: &'static str, status: crate::models::jobs::Status) -> Self {
        ApiError::InvalidTransition {
            action,
            status: status.as_str(),
        }
    }
}

impl From<TransactionError<ApiError>> for ApiError {
    fn from(err: TransactionError<ApiError>) -> Self {
        match err {
            TransactionError::Connection(e) => ApiError::Db(e),
            TransactionError::Transaction(e) => e,
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::AccessDenied | ApiError::HaulerSetupRequired => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if matches!(self, ApiError::HaulerSetupRequired) {
            body["setup_required"] = serde_json::json!(true);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jobs::Status;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            ApiError::validation("bad zip").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_transition("complete", Status::Bidding).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::HaulerSetupRequired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("Job").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_transition_names_the_blocking_status() {
        let err = ApiError::invalid_transition("complete", Status::Bidding);
        assert_eq!(err.to_string(), "cannot complete a job in status bidding");
    }
}
