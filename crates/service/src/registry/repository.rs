use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use models::{category, item, reservation};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::debug;

use crate::errors::ServiceError;
use crate::registry::ItemInput;

/// Persistence for items, reservations and categories.
///
/// Item writes keep the category set consistent: any category an item names
/// is created in the same transaction as the item.
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    async fn list_items(&self) -> Result<Vec<item::Model>, ServiceError>;
    async fn get_item(&self, id: &str) -> Result<Option<item::Model>, ServiceError>;
    /// Insert a new item under the next free id.
    async fn create_item(&self, fields: &ItemInput, image: &str) -> Result<item::Model, ServiceError>;
    /// Replace the item's fields; `image` is only written when given.
    async fn update_item(&self, id: &str, fields: &ItemInput, image: Option<&str>) -> Result<item::Model, ServiceError>;
    /// Delete the item together with its reservation; `None` if it did not exist.
    async fn delete_item(&self, id: &str) -> Result<Option<item::Model>, ServiceError>;

    async fn list_reservations(&self) -> Result<Vec<reservation::Model>, ServiceError>;
    async fn find_reservation(&self, item_id: &str) -> Result<Option<reservation::Model>, ServiceError>;
    async fn insert_reservation(
        &self,
        item_id: &str,
        name: &str,
        contact: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<reservation::Model, ServiceError>;
    async fn delete_reservation(&self, item_id: &str) -> Result<bool, ServiceError>;

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmRegistryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RegistryRepository for SeaOrmRegistryRepository {
    async fn list_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        Ok(item::Entity::find().all(&self.db).await?)
    }

    async fn get_item(&self, id: &str) -> Result<Option<item::Model>, ServiceError> {
        Ok(item::Entity::find_by_id(id.to_string()).one(&self.db).await?)
    }

    async fn create_item(&self, fields: &ItemInput, image: &str) -> Result<item::Model, ServiceError> {
        let txn = self.db.begin().await?;
        if category::ensure(&txn, &fields.category).await? {
            debug!(category = %fields.category, "category_created");
        }
        let ids = item::list_ids(&txn).await?;
        let row = item::Model {
            id: item::next_id(&ids),
            name: fields.name.clone(),
            description: fields.description.clone(),
            link: fields.link.clone(),
            image: image.to_string(),
            category: fields.category.clone(),
        };
        let created = item::insert(&txn, row).await?;
        txn.commit().await?;
        Ok(created)
    }

    async fn update_item(&self, id: &str, fields: &ItemInput, image: Option<&str>) -> Result<item::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = item::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("item"))?;
        if category::ensure(&txn, &fields.category).await? {
            debug!(category = %fields.category, "category_created");
        }
        let mut am: item::ActiveModel = existing.into();
        am.name = Set(fields.name.clone());
        am.description = Set(fields.description.clone());
        am.link = Set(fields.link.clone());
        am.category = Set(fields.category.clone());
        if let Some(img) = image {
            am.image = Set(img.to_string());
        }
        let updated = am.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn delete_item(&self, id: &str) -> Result<Option<item::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(existing) = item::Entity::find_by_id(id.to_string()).one(&txn).await? else {
            return Ok(None);
        };
        if reservation::delete_by_item(&txn, id).await? {
            debug!(item_id = %id, "reservation_cascaded");
        }
        item::Entity::delete_by_id(id.to_string()).exec(&txn).await?;
        txn.commit().await?;
        Ok(Some(existing))
    }

    async fn list_reservations(&self) -> Result<Vec<reservation::Model>, ServiceError> {
        Ok(reservation::Entity::find().all(&self.db).await?)
    }

    async fn find_reservation(&self, item_id: &str) -> Result<Option<reservation::Model>, ServiceError> {
        Ok(reservation::find_by_item(&self.db, item_id).await?)
    }

    async fn insert_reservation(
        &self,
        item_id: &str,
        name: &str,
        contact: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<reservation::Model, ServiceError> {
        Ok(reservation::create(&self.db, item_id, name, contact, at).await?)
    }

    async fn delete_reservation(&self, item_id: &str) -> Result<bool, ServiceError> {
        Ok(reservation::delete_by_item(&self.db, item_id).await?)
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(category::list_names(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buenos_aires, repo};
    use chrono::Utc;

    fn fields(category: &str) -> ItemInput {
        ItemInput {
            name: "Cubiertos".into(),
            description: Some("24 piezas".into()),
            link: "https://example.com/cubiertos".into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_categories() -> Result<(), anyhow::Error> {
        let repo = repo().await?;
        let a = repo.create_item(&fields("Cocina"), "/static/uploads/a.png").await?;
        let b = repo.create_item(&fields("Cocina"), "/static/uploads/b.png").await?;
        let c = repo.create_item(&fields("Baño"), "/static/uploads/c.png").await?;
        assert_eq!((a.id.as_str(), b.id.as_str(), c.id.as_str()), ("1", "2", "3"));
        assert_eq!(repo.list_categories().await?, vec!["Baño".to_string(), "Cocina".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_image_unless_given() -> Result<(), anyhow::Error> {
        let repo = repo().await?;
        let a = repo.create_item(&fields("Cocina"), "/static/uploads/a.png").await?;

        let mut changed = fields("Living");
        changed.name = "Lámpara".into();
        let u = repo.update_item(&a.id, &changed, None).await?;
        assert_eq!(u.name, "Lámpara");
        assert_eq!(u.category, "Living");
        assert_eq!(u.image, "/static/uploads/a.png");

        let u = repo.update_item(&a.id, &changed, Some("/static/uploads/z.gif")).await?;
        assert_eq!(u.image, "/static/uploads/z.gif");

        let missing = repo.update_item("99", &changed, None).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_reservation() -> Result<(), anyhow::Error> {
        let repo = repo().await?;
        let a = repo.create_item(&fields("Cocina"), "/static/uploads/a.png").await?;
        let now = Utc::now().with_timezone(&buenos_aires());
        repo.insert_reservation(&a.id, "Ana", "ana@example.com", now).await?;

        let removed = repo.delete_item(&a.id).await?;
        assert_eq!(removed.map(|m| m.id), Some(a.id.clone()));
        assert!(repo.find_reservation(&a.id).await?.is_none());
        assert!(repo.get_item(&a.id).await?.is_none());
        assert!(repo.delete_item(&a.id).await?.is_none());
        Ok(())
    }
}
