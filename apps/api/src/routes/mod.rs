pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        // Chain steps
        .route(
            "/api/v1/sessions/:id/job-description",
            post(handlers::handle_submit_job),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_submit_resume),
        )
        .route(
            "/api/v1/sessions/:id/interview/start",
            post(handlers::handle_start_interview),
        )
        .route(
            "/api/v1/sessions/:id/interview/responses",
            post(handlers::handle_candidate_response),
        )
        .with_state(state)
}
