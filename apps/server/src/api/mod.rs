//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Directory browsing
        .route(
            "/api/home-page-groupings",
            get(handlers::keywords::home_page_groupings),
        )
        .route("/api/keywords", get(handlers::keywords::list_keywords))
        // Search
        .route("/api/search", get(handlers::search::search))
        // Organisations
        .route("/api/organisations/:id", get(handlers::organisations::detail))
        .route(
            "/api/organisations/:id/report",
            post(handlers::organisations::report_incorrect_information),
        )
        .route(
            "/api/organisations/:id/rate",
            post(handlers::organisations::rate),
        )
        .route(
            "/api/organisations/send-sms",
            post(handlers::sms::send_sms),
        )
        // Add state
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors(&cors_origins))
        .layer(TraceLayer::new_for_http())
        // Limit request body size to prevent DoS via large payloads
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "signpost"
    }))
}
