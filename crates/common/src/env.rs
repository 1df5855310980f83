//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the upload directory exists, creating it when missing.
pub async fn ensure_upload_dir(upload_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(upload_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{upload_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%upload_dir, "upload directory not found; creating it");
            tokio::fs::create_dir_all(upload_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
            info!(%upload_dir, "upload directory created");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_upload_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("catalog_env_{}", std::process::id()));
        let dir_str = dir.to_string_lossy().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        ensure_upload_dir(&dir_str).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        // idempotent
        ensure_upload_dir(&dir_str).await?;

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
