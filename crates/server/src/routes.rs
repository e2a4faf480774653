use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::admin;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod items;
pub mod registry;
pub mod reservations;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, guarded admin writes,
/// uploaded images and the API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(&state.uploads.dir);
    let uploads_prefix = state.uploads.public_prefix.clone();

    // Public routes (reads + reserving)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/snapshot", get(registry::snapshot))
        .route("/api/categories", get(registry::categories))
        .route("/api/items", get(items::list))
        .route("/api/items/:id", get(items::get))
        .route("/api/reservations", get(reservations::list).post(reservations::reserve));

    // Admin routes, guarded when an admin key is configured
    let admin_routes = Router::new()
        .route("/api/items", post(items::create))
        .route("/api/items/:id", put(items::update).delete(items::delete))
        .route("/api/reservations/:item_id", delete(reservations::unreserve))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin::require_admin_key))
        .layer(DefaultBodyLimit::max(state.uploads.max_bytes));

    public
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service(&uploads_prefix, uploads)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
