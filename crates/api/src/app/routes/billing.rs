use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/monthly/preview", post(preview_monthly))
        .route("/monthly/commit", post(commit_monthly))
}

pub async fn preview_monthly(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::BillingRunRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let request = match body.into_request() {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.billing().preview(&request) {
        Ok(result) => (StatusCode::OK, Json(dto::billing_run_to_json(&result))).into_response(),
        Err(e) => errors::billing_error_to_response(e),
    }
}

/// Always 201 once the run started: per-client failures are listed in the body.
pub async fn commit_monthly(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::BillingRunRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let request = match body.into_request() {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.billing().commit(&request, Utc::now()) {
        Ok(result) => {
            (StatusCode::CREATED, Json(dto::billing_commit_to_json(&result))).into_response()
        }
        Err(e) => errors::billing_error_to_response(e),
    }
}
