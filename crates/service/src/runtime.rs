//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the upload directory exists; warn when the static root is missing.
pub async fn ensure_env(static_dir: &str, upload_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir, upload_dir).await
}
