use chrono::{DateTime, FixedOffset};
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, item};

/// Column widths of `reservation.name` and `reservation.contact`.
pub const NAME_MAX_LEN: usize = 256;
pub const CONTACT_MAX_LEN: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub item_id: String,
    pub name: String,
    pub contact: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Item }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Item => Entity::belongs_to(item::Entity)
                .from(Column::ItemId)
                .to(item::Column::Id)
                .into(),
        }
    }
}

impl Related<item::Entity> for Entity {
    fn to() -> RelationDef { Relation::Item.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_item<C: ConnectionTrait>(db: &C, item_id: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::ItemId.eq(item_id)).one(db).await?)
}

/// Insert a reservation; a second row for the same item fails with `Conflict`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    item_id: &str,
    name: &str,
    contact: &str,
    created_at: DateTime<FixedOffset>,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item_id.to_string()),
        name: Set(name.to_string()),
        contact: Set(contact.to_string()),
        created_at: Set(created_at),
    };
    am.insert(db).await.map_err(|e| match errors::ModelError::from(e) {
        errors::ModelError::Conflict(_) => errors::ModelError::Conflict(format!("item {item_id} already reserved")),
        other => other,
    })
}

/// Delete the reservation for an item; returns whether one existed.
pub async fn delete_by_item<C: ConnectionTrait>(db: &C, item_id: &str) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_many().filter(Column::ItemId.eq(item_id)).exec(db).await?;
    Ok(res.rows_affected > 0)
}
