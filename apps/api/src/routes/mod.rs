pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload form + HTML result page
        .route(
            "/",
            get(handlers::handle_upload_form).post(handlers::handle_upload_page),
        )
        // JSON variant for API consumers
        .route("/api/v1/resumes", post(handlers::handle_upload_json))
        .with_state(state)
}
