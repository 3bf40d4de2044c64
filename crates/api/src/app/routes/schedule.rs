use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use facturation_core::ScheduleEntryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_entry))
        .route("/:id", get(get_entry))
}

pub async fn create_entry(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateScheduleEntryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let entry = match body.into_entry() {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.add_schedule_entry(entry) {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({"id": id.to_string()}))).into_response(),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn get_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let entry_id: ScheduleEntryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid schedule entry id");
        }
    };
    match services.schedule_entry_get(entry_id) {
        Ok(Some(e)) => (StatusCode::OK, Json(dto::schedule_entry_to_json(&e))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "schedule entry not found"),
        Err(e) => errors::storage_error_to_response(e),
    }
}
