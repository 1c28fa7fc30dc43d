use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, match_handler, method_not_allowed_handler};
use super::server::AppState;

pub(crate) fn build_router(state: AppState, path: &str, max_body_size: usize) -> Router {
    // the size limit wraps only the POST handler so other methods get 405 unread
    let api = Router::new()
        .route(
            path,
            post(match_handler.layer(RequestBodyLimitLayer::new(max_body_size)))
                .fallback(method_not_allowed_handler),
        )
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
