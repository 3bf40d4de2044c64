use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use facturation_core::ClientId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/:id", get(get_client))
}

pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateClientRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let client = match body.into_client() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.register_client(client) {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({"id": id.to_string()}))).into_response(),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn get_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client_id: ClientId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id"),
    };
    match services.clients_get(client_id) {
        Ok(Some(c)) => (StatusCode::OK, Json(dto::client_to_json(&c))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "client not found"),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn list_clients(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.clients_list() {
        Ok(clients) => {
            let items = clients.iter().map(dto::client_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::storage_error_to_response(e),
    }
}
