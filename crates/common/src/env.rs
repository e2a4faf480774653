//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the upload directory exists and warn when the static root is missing.
pub async fn ensure_env(static_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static directory not found; it will only contain uploads");
    }
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
    info!(upload_dir = %Path::new(upload_dir).display(), "upload directory ready");
    Ok(())
}
