//! Load products from a JSON file into the catalog database.
//!
//! Usage: `seed [path]`; the path defaults to `SEED_FILE` or `seed/products.json`.
//! The file holds an array of `{name, description, price, discountedPrice?,
//! partNumber, imageUrl?}` objects.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use configs::StorageConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use service::{
    product::{domain::NewProduct, repo::seaorm::SeaOrmProductRepository, ProductService},
    storage::local_fs::LocalBlobStore,
};
use tracing::{error, info, warn};

fn seed_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SEED_FILE").ok())
        .unwrap_or_else(|| "seed/products.json".to_string())
        .into()
}

async fn seed() -> anyhow::Result<(usize, usize)> {
    let cfg = configs::AppConfig::load_and_validate()?;
    let db = connect_with_config(&DatabaseConfig::from_app(&cfg.database)).await?;
    seed_file(&seed_path(), db, &cfg.storage).await
}

/// Migrate `db` and insert every product in the JSON file at `path`.
/// Returns `(created, skipped)`; invalid entries are skipped with a warning.
async fn seed_file(path: &Path, db: DatabaseConnection, storage: &StorageConfig) -> anyhow::Result<(usize, usize)> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let products: Vec<NewProduct> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;

    migration::Migrator::up(&db, None).await?;
    let svc = ProductService::new(
        Arc::new(SeaOrmProductRepository::new(db)),
        Arc::new(LocalBlobStore::new(&storage.upload_dir, &storage.public_prefix)),
    );

    let (mut created, mut skipped) = (0, 0);
    for product in products {
        let name = product.name.clone();
        match svc.create(product, None).await {
            Ok(p) => {
                info!(id = p.id, %name, "seeded product");
                created += 1;
            }
            Err(e) if e.is_client_error() => {
                warn!(%name, error = %e, "skipping invalid product");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok((created, skipped))
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(seed()) {
        Ok((created, skipped)) => {
            info!(created, skipped, "seeding complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "seeding failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use uuid::Uuid;

    async fn write_seed(body: &str) -> anyhow::Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("catalog-seed-{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }

    #[tokio::test]
    async fn seeds_valid_products_and_skips_invalid_ones() -> anyhow::Result<()> {
        let path = write_seed(
            r#"[
                {"name": "Lamp", "description": "Desk lamp", "price": 20, "discountedPrice": 15, "partNumber": "L-1"},
                {"name": "Chair", "description": "Office chair", "price": 60.5, "partNumber": "C-1"},
                {"name": " ", "description": "No name", "price": 1, "partNumber": "X-1"}
            ]"#,
        )
        .await?;
        let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;

        let counts = seed_file(&path, db.clone(), &StorageConfig::default()).await?;
        assert_eq!(counts, (2, 1));
        assert_eq!(models::product::Entity::find().count(&db).await?, 2);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() -> anyhow::Result<()> {
        let path = write_seed(r#"{"name": "not an array"}"#).await?;
        let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;

        let err = seed_file(&path, db, &StorageConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("parsing"));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
