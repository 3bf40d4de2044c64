use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use facturation_billing::{BillingError, StorageError};
use facturation_core::DomainError;

pub fn billing_error_to_response(err: BillingError) -> axum::response::Response {
    match err {
        BillingError::InvalidPeriod { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_period", err.to_string())
        }
        BillingError::CommitInProgress { .. } => {
            json_error(StatusCode::CONFLICT, "commit_in_progress", err.to_string())
        }
        BillingError::AmountOutOfRange(_) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "amount_out_of_range",
            err.to_string(),
        ),
        BillingError::Storage(e) => storage_error_to_response(e),
    }
}

pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    tracing::error!(error = %err, "storage failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

/// Unparsable or mistyped JSON bodies.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "malformed_request", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
