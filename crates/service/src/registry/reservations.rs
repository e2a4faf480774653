use std::sync::Arc;

use chrono::{FixedOffset, SubsecRound, Utc};
use models::item::{validate_bounded, validate_required};
use models::reservation::{CONTACT_MAX_LEN, NAME_MAX_LEN};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::registry::{repository::RegistryRepository, reservation_map, ReservationMap};

/// Claims on items: one per item, stamped in the registry's fixed offset.
pub struct ReservationService<R: RegistryRepository> {
    repo: Arc<R>,
    offset: FixedOffset,
}

impl<R: RegistryRepository> ReservationService<R> {
    pub fn new(repo: Arc<R>, offset: FixedOffset) -> Self { Self { repo, offset } }

    pub async fn list(&self) -> Result<ReservationMap, ServiceError> {
        Ok(reservation_map(self.repo.list_reservations().await?, &self.offset))
    }

    /// Reserve `item_id` for `name`; returns every reservation afterwards.
    ///
    /// The existence check gives a clear error for the common case; two
    /// concurrent attempts are settled by the unique index on `item_id`.
    #[instrument(skip(self, contact))]
    pub async fn reserve(&self, item_id: &str, name: &str, contact: &str) -> Result<ReservationMap, ServiceError> {
        let item_id = validate_required("item_id", item_id)?;
        let name = validate_bounded("name", name, NAME_MAX_LEN)?;
        let contact = validate_bounded("contact", contact, CONTACT_MAX_LEN)?;

        if self.repo.get_item(&item_id).await?.is_none() {
            return Err(ServiceError::not_found("item"));
        }
        if self.repo.find_reservation(&item_id).await?.is_some() {
            warn!(%item_id, "reservation_rejected_already_reserved");
            return Err(ServiceError::Conflict("item already reserved".into()));
        }

        let now = Utc::now().with_timezone(&self.offset).trunc_subsecs(0);
        let created = self
            .repo
            .insert_reservation(&item_id, &name, &contact, now)
            .await
            .map_err(|e| match e {
                ServiceError::Conflict(_) => ServiceError::Conflict("item already reserved".into()),
                other => other,
            })?;
        info!(item_id = %created.item_id, reservation_id = %created.id, "reservation_created");
        self.list().await
    }

    /// Drop the reservation on `item_id`.
    #[instrument(skip(self))]
    pub async fn unreserve(&self, item_id: &str) -> Result<(), ServiceError> {
        if !self.repo.delete_reservation(item_id.trim()).await? {
            return Err(ServiceError::not_found("reservation"));
        }
        info!(%item_id, "reservation_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ItemInput;
    use crate::test_support::{buenos_aires, repo};

    async fn service_with_item() -> Result<(ReservationService<crate::registry::repository::SeaOrmRegistryRepository>, String), anyhow::Error> {
        let repo = repo().await?;
        let input = ItemInput {
            name: "Set de Toallas".into(),
            description: None,
            link: "https://example.com/toallas".into(),
            category: "Baño".into(),
        };
        let item = repo.create_item(&input, "/static/uploads/t.webp").await?;
        Ok((ReservationService::new(repo, buenos_aires()), item.id))
    }

    #[tokio::test]
    async fn reserve_returns_full_map_with_offset_timestamp() -> Result<(), anyhow::Error> {
        let (svc, id) = service_with_item().await?;
        let map = svc.reserve(&id, "Ana", "ana@example.com").await?;

        let r = &map[&id];
        assert_eq!(r.name, "Ana");
        assert_eq!(r.contact, "ana@example.com");
        assert_eq!(r.date.offset(), &buenos_aires());
        Ok(())
    }

    #[tokio::test]
    async fn second_reservation_conflicts_and_keeps_first() -> Result<(), anyhow::Error> {
        let (svc, id) = service_with_item().await?;
        let first = svc.reserve(&id, "Ana", "ana@example.com").await?;

        let again = svc.reserve(&id, "Beto", "beto@example.com").await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.list().await?, first);
        Ok(())
    }

    #[tokio::test]
    async fn reserve_validates_input() -> Result<(), anyhow::Error> {
        let (svc, id) = service_with_item().await?;
        assert!(matches!(svc.reserve(&id, " ", "ana@example.com").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.reserve(&id, "Ana", "").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.reserve("", "Ana", "ana@example.com").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.reserve("42", "Ana", "ana@example.com").await, Err(ServiceError::NotFound(_))));
        assert!(svc.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn over_length_name_or_contact_is_a_validation_error() -> Result<(), anyhow::Error> {
        let (svc, id) = service_with_item().await?;
        let long = "a".repeat(300);
        assert!(matches!(svc.reserve(&id, &long, "ana@example.com").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.reserve(&id, "Ana", &long).await, Err(ServiceError::Validation(_))));
        assert!(svc.list().await?.is_empty());

        let at_limit = "b".repeat(CONTACT_MAX_LEN);
        svc.reserve(&id, "Ana", &at_limit).await?;
        Ok(())
    }

    #[tokio::test]
    async fn unreserve_removes_or_reports_missing() -> Result<(), anyhow::Error> {
        let (svc, id) = service_with_item().await?;
        assert!(matches!(svc.unreserve(&id).await, Err(ServiceError::NotFound(_))));

        svc.reserve(&id, "Ana", "ana@example.com").await?;
        svc.unreserve(&id).await?;
        assert!(svc.list().await?.is_empty());

        // the item is free again
        svc.reserve(&id, "Beto", "beto@example.com").await?;
        Ok(())
    }
}
