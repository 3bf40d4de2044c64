use axum::Router;

pub mod billing;
pub mod clients;
pub mod invoices;
pub mod schedule;
pub mod system;

/// Router for all business endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/billing", billing::router())
        .nest("/clients", clients::router())
        .nest("/schedule-entries", schedule::router())
        .nest("/invoices", invoices::router())
}
