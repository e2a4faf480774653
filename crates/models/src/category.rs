use sea_orm::{entity::prelude::*, sea_query::OnConflict, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Column width of `category.name`.
pub const NAME_MAX_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(errors::ModelError::Validation("category is required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("category must be at most {NAME_MAX_LEN} characters")));
    }
    Ok(name.to_string())
}

/// Insert the category unless it already exists; returns whether a row was created.
pub async fn ensure<C: ConnectionTrait>(db: &C, name: &str) -> Result<bool, errors::ModelError> {
    let name = validate_name(name)?;
    let am = ActiveModel { name: Set(name) };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}

pub async fn list_names<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, errors::ModelError> {
    let rows = Entity::find().order_by_asc(Column::Name).all(db).await?;
    Ok(rows.into_iter().map(|c| c.name).collect())
}
