use std::sync::Arc;

use models::item::{self, validate_image_extension};
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::registry::{repository::RegistryRepository, sort_items, ItemInput};
use crate::storage::image_store::{ImageStore, ImageUpload};

/// Admin-side item management: validation, ids, categories and images.
pub struct ItemService<R: RegistryRepository> {
    repo: Arc<R>,
    images: Arc<dyn ImageStore>,
}

impl<R: RegistryRepository> ItemService<R> {
    pub fn new(repo: Arc<R>, images: Arc<dyn ImageStore>) -> Self { Self { repo, images } }

    pub async fn list_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        let mut items = self.repo.list_items().await?;
        sort_items(&mut items);
        Ok(items)
    }

    pub async fn get_item(&self, id: &str) -> Result<item::Model, ServiceError> {
        self.repo
            .get_item(id.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("item"))
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.repo.list_categories().await
    }

    /// Validate, store the image, then insert the row under a fresh id.
    #[instrument(skip(self, input, image), fields(name = %input.name))]
    pub async fn create_item(&self, input: ItemInput, image: Option<ImageUpload>) -> Result<item::Model, ServiceError> {
        let fields = input.validated()?;
        let image = image.ok_or_else(|| ServiceError::Validation("image is required".into()))?;
        let ext = checked_extension(&image)?;

        let reference = self.images.save(&ext, &image.bytes).await?;
        match self.repo.create_item(&fields, &reference).await {
            Ok(created) => {
                info!(item_id = %created.id, category = %created.category, "item_created");
                Ok(created)
            }
            Err(e) => {
                self.discard_image(&reference).await;
                Err(e)
            }
        }
    }

    /// Replace an item's fields; the image changes only when a new one is sent.
    #[instrument(skip(self, input, image))]
    pub async fn update_item(
        &self,
        id: &str,
        input: ItemInput,
        image: Option<ImageUpload>,
    ) -> Result<item::Model, ServiceError> {
        let existing = self.get_item(id).await?;
        let fields = input.validated()?;
        let new_ext = image.as_ref().map(checked_extension).transpose()?;

        let new_reference = match (image, new_ext) {
            (Some(img), Some(ext)) => Some(self.images.save(&ext, &img.bytes).await?),
            _ => None,
        };

        let updated = match self.repo.update_item(&existing.id, &fields, new_reference.as_deref()).await {
            Ok(u) => u,
            Err(e) => {
                if let Some(r) = &new_reference {
                    self.discard_image(r).await;
                }
                return Err(e);
            }
        };

        if new_reference.is_some() && existing.image != updated.image {
            self.discard_image(&existing.image).await;
        }
        info!(item_id = %updated.id, image_replaced = new_reference.is_some(), "item_updated");
        Ok(updated)
    }

    /// Delete an item with its reservation and image.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<item::Model, ServiceError> {
        let removed = self
            .repo
            .delete_item(id.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("item"))?;
        self.discard_image(&removed.image).await;
        info!(item_id = %removed.id, "item_deleted");
        Ok(removed)
    }

    /// Image cleanup never undoes a committed row change; failures are logged.
    async fn discard_image(&self, reference: &str) {
        if let Err(e) = self.images.remove(reference).await {
            error!(%reference, error = %e, "image cleanup failed");
        }
    }
}

fn checked_extension(image: &ImageUpload) -> Result<String, ServiceError> {
    let ext = validate_image_extension(&image.file_name)?;
    if image.bytes.is_empty() {
        warn!(file = %image.file_name, "empty image upload rejected");
        return Err(ServiceError::Validation("image file is empty".into()));
    }
    Ok(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::repository::SeaOrmRegistryRepository;
    use crate::registry::reservations::ReservationService;
    use crate::registry::snapshot::SnapshotService;
    use crate::test_support::{buenos_aires, image_store, png, repo, temp_upload_dir};
    use models::category;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use std::path::PathBuf;

    struct Fixture {
        repo: Arc<SeaOrmRegistryRepository>,
        svc: ItemService<SeaOrmRegistryRepository>,
        dir: PathBuf,
    }

    impl Fixture {
        async fn new() -> Result<Self, anyhow::Error> {
            let repo = repo().await?;
            let dir = temp_upload_dir();
            let images = image_store(&dir).await?;
            let svc = ItemService::new(Arc::clone(&repo), images);
            Ok(Self { repo, svc, dir })
        }

        fn file_for(&self, reference: &str) -> PathBuf {
            let name = reference.rsplit('/').next().unwrap_or_default();
            self.dir.join(name)
        }

        async fn category_count(&self) -> u64 {
            category::Entity::find().count(&self.repo.db).await.unwrap_or_default()
        }
    }

    fn input(category: &str) -> ItemInput {
        ItemInput {
            name: "Juego de Platos".into(),
            description: Some("18 piezas".into()),
            link: "https://example.com/platos".into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn create_then_snapshot_roundtrip() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        let created = fx.svc.create_item(input("Cocina"), Some(png("platos.PNG"))).await?;
        assert_eq!(created.id, "1");
        assert!(created.image.ends_with(".png"));
        assert!(tokio::fs::metadata(fx.file_for(&created.image)).await.is_ok());

        let snap = SnapshotService::new(Arc::clone(&fx.repo), buenos_aires()).load_snapshot().await;
        let stored = snap.items.iter().find(|i| i.id == created.id).expect("in snapshot");
        assert_eq!(stored, &created);
        assert_eq!(stored.name, "Juego de Platos");
        assert_eq!(stored.description.as_deref(), Some("18 piezas"));
        assert_eq!(stored.link, "https://example.com/platos");
        assert_eq!(stored.category, "Cocina");
        Ok(())
    }

    #[tokio::test]
    async fn disallowed_extension_always_rejected() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        for name in ["doc.pdf", "script.svg", "image", "photo.jpg.exe"] {
            let res = fx.svc.create_item(input("Cocina"), Some(png(name))).await;
            assert!(matches!(res, Err(ServiceError::Validation(_))), "{name} accepted");
        }
        let res = fx.svc.create_item(ItemInput::default(), Some(png("doc.pdf"))).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));

        assert!(fx.svc.list_items().await?.is_empty());
        assert_eq!(fx.category_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_rejected() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        let res = fx.svc.create_item(input("Cocina"), None).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));

        let mut no_link = input("Cocina");
        no_link.link = "  ".into();
        let res = fx.svc.create_item(no_link, Some(png("a.png"))).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));

        let empty = ImageUpload { file_name: "a.png".into(), bytes: Vec::new() };
        let res = fx.svc.create_item(input("Cocina"), Some(empty)).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn new_category_added_once() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        fx.svc.create_item(input("Cocina"), Some(png("a.png"))).await?;
        assert_eq!(fx.category_count().await, 1);
        fx.svc.create_item(input("Cocina"), Some(png("b.png"))).await?;
        assert_eq!(fx.category_count().await, 1);
        fx.svc.create_item(input("Baño"), Some(png("c.png"))).await?;
        assert_eq!(fx.category_count().await, 2);
        assert_eq!(fx.svc.list_categories().await?, vec!["Baño".to_string(), "Cocina".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_image_only_when_given() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        let created = fx.svc.create_item(input("Cocina"), Some(png("a.png"))).await?;

        let mut changed = input("Living");
        changed.description = None;
        let kept = fx.svc.update_item(&created.id, changed.clone(), None).await?;
        assert_eq!(kept.image, created.image);
        assert_eq!(kept.category, "Living");
        assert_eq!(kept.description, None);

        let replaced = fx.svc.update_item(&created.id, changed.clone(), Some(png("b.webp"))).await?;
        assert_ne!(replaced.image, created.image);
        assert!(replaced.image.ends_with(".webp"));
        assert!(tokio::fs::metadata(fx.file_for(&created.image)).await.is_err());
        assert!(tokio::fs::metadata(fx.file_for(&replaced.image)).await.is_ok());

        let bad = fx.svc.update_item(&created.id, changed.clone(), Some(png("b.bmp"))).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        let missing = fx.svc.update_item("77", changed, None).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_reservation_and_image() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        let created = fx.svc.create_item(input("Cocina"), Some(png("a.png"))).await?;
        let reservations = ReservationService::new(Arc::clone(&fx.repo), buenos_aires());
        reservations.reserve(&created.id, "Ana", "ana@example.com").await?;

        fx.svc.delete_item(&created.id).await?;
        assert!(matches!(fx.svc.get_item(&created.id).await, Err(ServiceError::NotFound(_))));
        assert!(reservations.list().await?.is_empty());
        assert!(tokio::fs::metadata(fx.file_for(&created.image)).await.is_err());

        assert!(matches!(fx.svc.delete_item(&created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn ids_keep_growing_after_delete() -> Result<(), anyhow::Error> {
        let fx = Fixture::new().await?;
        let a = fx.svc.create_item(input("Cocina"), Some(png("a.png"))).await?;
        let b = fx.svc.create_item(input("Cocina"), Some(png("b.png"))).await?;
        fx.svc.delete_item(&a.id).await?;
        let c = fx.svc.create_item(input("Cocina"), Some(png("c.png"))).await?;
        assert_eq!((b.id.as_str(), c.id.as_str()), ("2", "3"));
        Ok(())
    }
}
