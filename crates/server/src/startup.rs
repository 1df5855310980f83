use std::{net::SocketAddr, sync::Arc};

use axum::http::{HeaderValue, Method};
use configs::{AppConfig, CorsConfig};
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use service::{
    product::{repo::seaorm::SeaOrmProductRepository, ListLimits, ProductService},
    runtime,
    storage::local_fs::LocalBlobStore,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{errors::StartupError, routes, state::ServerState};

/// CORS for the configured frontend origin, or any origin when none is set.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let Some(url) = cfg.frontend_url.as_deref() else {
        return CorsLayer::very_permissive();
    };
    match url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::HEAD, Method::PUT, Method::PATCH, Method::POST, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT]),
        Err(_) => {
            warn!(frontend_url = %url, "invalid FRONTEND_URL, allowing any origin");
            CorsLayer::very_permissive()
        }
    }
}

/// Connect the database, apply migrations, prepare the upload directory and
/// wire the product service.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = connect_with_config(&DatabaseConfig::from_app(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    runtime::ensure_env(&cfg.storage.upload_dir).await?;

    let repo = Arc::new(SeaOrmProductRepository::new(db));
    let blobs = Arc::new(LocalBlobStore::new(&cfg.storage.upload_dir, &cfg.storage.public_prefix));
    let limits = ListLimits {
        default_limit: cfg.pagination.default_limit,
        max_limit: cfg.pagination.max_limit,
        max_image_bytes: cfg.storage.max_file_size,
    };
    let products = ProductService::new(repo, blobs).with_limits(limits);
    Ok(ServerState { products: Arc::new(products), max_file_size: cfg.storage.max_file_size })
}

pub fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Public entry: build the app and serve it on the configured address.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, build_cors(&cfg.cors), &cfg.storage);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, upload_dir = %cfg.storage.upload_dir, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
