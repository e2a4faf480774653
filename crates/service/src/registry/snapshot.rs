use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::registry::{repository::RegistryRepository, reservation_map, sort_items, Snapshot};

/// Assembles the full registry view for pages and API responses.
pub struct SnapshotService<R: RegistryRepository> {
    repo: Arc<R>,
    offset: FixedOffset,
}

impl<R: RegistryRepository> SnapshotService<R> {
    pub fn new(repo: Arc<R>, offset: FixedOffset) -> Self { Self { repo, offset } }

    /// Full snapshot, or an empty one if any read fails.
    pub async fn load_snapshot(&self) -> Snapshot {
        match self.try_load_snapshot().await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "snapshot load failed; serving empty registry");
                Snapshot::default()
            }
        }
    }

    /// Full snapshot, propagating storage errors.
    #[instrument(skip(self))]
    pub async fn try_load_snapshot(&self) -> Result<Snapshot, ServiceError> {
        let mut items = self.repo.list_items().await?;
        sort_items(&mut items);
        let reservations = reservation_map(self.repo.list_reservations().await?, &self.offset);
        let categories = self.repo.list_categories().await?;
        Ok(Snapshot { items, reservations, categories })
    }
}
