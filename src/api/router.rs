use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let journal = Router::new()
        .route(
            "/api/trades",
            get(handlers::trades::list).post(handlers::trades::create),
        )
        .route("/api/trades/:trade_id", get(handlers::trades::detail))
        .route(
            "/api/trades/:trade_id/screenshot",
            get(handlers::trades::screenshot).delete(handlers::trades::delete_screenshot),
        )
        .route("/api/export", get(handlers::export::download))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    // Local single-user tool; the form may be served from another port.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(journal)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
