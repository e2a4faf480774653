use std::{path::PathBuf, sync::Arc};

use chrono::FixedOffset;
use sea_orm::DatabaseConnection;
use service::registry::{
    items::ItemService, repository::SeaOrmRegistryRepository, reservations::ReservationService,
    snapshot::SnapshotService,
};
use service::storage::image_store::ImageStore;

pub type Repo = SeaOrmRegistryRepository;

/// Where uploads are written, the URL prefix they are served under and the
/// largest body accepted by the item form.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub public_prefix: String,
    pub max_bytes: usize,
}

#[derive(Clone)]
pub struct ServerState {
    pub items: Arc<ItemService<Repo>>,
    pub reservations: Arc<ReservationService<Repo>>,
    pub snapshot: Arc<SnapshotService<Repo>>,
    pub admin_api_key: Option<Arc<str>>,
    pub uploads: UploadSettings,
}

impl ServerState {
    pub fn new(
        db: DatabaseConnection,
        images: Arc<dyn ImageStore>,
        offset: FixedOffset,
        admin_api_key: Option<String>,
        uploads: UploadSettings,
    ) -> Self {
        let repo = Arc::new(SeaOrmRegistryRepository { db });
        Self {
            items: Arc::new(ItemService::new(Arc::clone(&repo), images)),
            reservations: Arc::new(ReservationService::new(Arc::clone(&repo), offset)),
            snapshot: Arc::new(SnapshotService::new(repo, offset)),
            admin_api_key: admin_api_key.map(Arc::from),
            uploads,
        }
    }
}
