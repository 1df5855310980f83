pub mod products;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use common::types::Health;
use configs::StorageConfig;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{openapi::ApiDoc, state::ServerState};

/// Room for the text parts of a product form on top of the image itself.
const FORM_OVERHEAD: usize = 1024 * 1024;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: product API, uploaded images, health
/// and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer, storage: &StorageConfig) -> Router {
    let body_limit = state.max_file_size.saturating_add(FORM_OVERHEAD);

    let api = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .nest_service(&storage.public_prefix, ServeDir::new(&storage.upload_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
