//! HTTP API for article extraction and derived artifacts.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/parse", post(routes::parse))
        .route("/api/about", post(routes::about))
        .route("/api/thesis", post(routes::thesis))
        .route("/api/telegram", post(routes::telegram))
        .route("/api/translate", post(routes::translate))
        .route("/api/illustration", post(routes::illustration))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
