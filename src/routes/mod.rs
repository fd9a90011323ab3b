pub mod chat;
pub mod health;
pub mod photos;
pub mod profile;
pub mod simulations;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application: the JSON API plus uploaded files under `/uploads`.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.config.uploads_path());

    Router::new()
        .route("/api/health", get(health::health))
        .merge(profile::router())
        .merge(photos::router())
        .merge(chat::router())
        .merge(simulations::router())
        .nest_service("/uploads", uploads)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
