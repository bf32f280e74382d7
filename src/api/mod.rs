pub mod health;
pub mod items;
pub mod reports;

pub use health::health_check;
pub use items::{create_item, delete_item, get_item, list_items, update_item};
pub use reports::{generate_all, generate_from_items, preview_report, sample_report};

use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// All HTTP routes, with tracing, permissive CORS and the request size limit.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes();

    let api_routes = Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/reports/preview", get(preview_report))
        .route(
            "/api/reports/generate",
            get(generate_all).post(generate_from_items),
        )
        .route("/api/reports/sample", get(sample_report));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
