#![cfg(test)]
use std::{path::PathBuf, sync::Arc};

use chrono::FixedOffset;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

use crate::registry::repository::SeaOrmRegistryRepository;
use crate::storage::image_store::{FsImageStore, ImageUpload};

pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// Fresh in-memory SQLite with migrations applied; one per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn repo() -> Result<Arc<SeaOrmRegistryRepository>, anyhow::Error> {
    Ok(Arc::new(SeaOrmRegistryRepository { db: get_db().await? }))
}

pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("registry_uploads_{}", uuid::Uuid::new_v4()))
}

pub async fn image_store(dir: &PathBuf) -> Result<Arc<FsImageStore>, anyhow::Error> {
    Ok(FsImageStore::new(dir, PUBLIC_PREFIX).await?)
}

pub fn buenos_aires() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("valid offset")
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload { file_name: name.to_string(), bytes: vec![0x89, b'P', b'N', b'G'] }
}
