use std::net::SocketAddr;

use anyhow::anyhow;
use axum::Router;
use chrono::FixedOffset;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::{ServerState, UploadSettings};
use service::{runtime, storage::image_store::FsImageStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Registry offset from the configured minutes east of UTC.
pub fn registry_offset(cfg: &AppConfig) -> anyhow::Result<FixedOffset> {
    let minutes = cfg.registry.utc_offset_minutes;
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| anyhow!("invalid utc offset: {minutes} minutes"))
}

/// Wire services over an already migrated database.
pub async fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> anyhow::Result<ServerState> {
    let reg = &cfg.registry;
    let images = FsImageStore::new(&reg.upload_dir, &reg.public_prefix).await?;
    let uploads = UploadSettings {
        dir: reg.upload_dir.clone().into(),
        public_prefix: reg.public_prefix.clone(),
        max_bytes: reg.max_upload_bytes,
    };
    Ok(ServerState::new(db, images, registry_offset(cfg)?, reg.admin_api_key.clone(), uploads))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: connect, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.registry.static_dir, &cfg.registry.upload_dir).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    if cfg.registry.admin_api_key.is_none() {
        info!("no admin key configured; admin routes are open");
    }
    let state = build_state(&cfg, db).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting gift registry server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
