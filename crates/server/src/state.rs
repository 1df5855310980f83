use std::sync::Arc;

use service::product::{repo::seaorm::SeaOrmProductRepository, ProductService};
use service::storage::local_fs::LocalBlobStore;

/// Product service wired to the database and the local upload directory.
pub type CatalogService = ProductService<SeaOrmProductRepository, LocalBlobStore>;

#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<CatalogService>,
    /// Upper bound for a single uploaded image, in bytes.
    pub max_file_size: usize,
}
