//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the upload directory exists before the server starts accepting files.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_upload_dir(upload_dir).await
}
