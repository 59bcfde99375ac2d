pub mod activities;
pub mod auth;
pub mod common;
pub mod foods;
pub mod health;
pub mod health_data;
pub mod medical_history;
pub mod medications;
pub mod reminders;
pub mod sleep;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

/// Maximum request body size: 2 MiB.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/activities", activities::router())
        .nest("/foods", foods::router())
        .nest("/sleep", sleep::router())
        .nest("/health-data", health_data::router())
        .nest("/medications", medications::router())
        .nest("/medical-history", medical_history::router())
        .nest("/reminders", reminders::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> AppError {
    AppError::not_found("Not found")
}
