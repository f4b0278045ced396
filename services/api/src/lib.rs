pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    // Permissive CORS so a separate frontend can drive the sessions.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = Router::new()
        .route("/", post(routes::create))
        .route("/{session_id}", axum::routing::delete(routes::delete))
        .route("/{session_id}/answers", post(routes::submit_answer))
        .route("/{session_id}/result", get(routes::result));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/sessions", session_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
