//! Route table and middleware stack.

use axum::{routing::get, Extension, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState, prometheus: PrometheusHandle) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        // Map page
        .route("/", get(handlers::pages::index_handler))
        .route("/index.html", get(handlers::pages::index_handler))
        .route("/favicon.ico", get(handlers::pages::favicon_handler))
        .nest_service("/static", static_files)
        // Data API
        .route("/api/meta", get(handlers::meta::meta_handler))
        .route("/api/geo/:layer", get(handlers::geo::geo_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .fallback(handlers::pages::not_found_handler)
        // Middleware
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
