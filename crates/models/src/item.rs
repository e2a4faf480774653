use std::cmp::Ordering;
use std::path::Path;

use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{category, errors};

/// Image extensions accepted for uploads, lowercase.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Column width of `item.name`.
pub const NAME_MAX_LEN: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub link: String,
    pub image: String,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::Category)
                .to(category::Column::Name)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim `value` and reject it when nothing is left.
pub fn validate_required(field: &str, value: &str) -> Result<String, errors::ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// [`validate_required`] plus a cap of `max` characters, matching the column width.
pub fn validate_bounded(field: &str, value: &str, max: usize) -> Result<String, errors::ModelError> {
    let v = validate_required(field, value)?;
    if v.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(v)
}

/// Blank descriptions are stored as NULL.
pub fn normalize_description(d: Option<&str>) -> Option<String> {
    d.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Lowercased extension of an uploaded file name, if it is an allowed image type.
pub fn validate_image_extension(file_name: &str) -> Result<String, errors::ModelError> {
    let ext = Path::new(file_name.trim())
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| errors::ModelError::Validation("image file has no extension".into()))?;
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(errors::ModelError::Validation(format!(
            "image type '{ext}' not allowed (expected one of {})",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )));
    }
    Ok(ext)
}

/// Next identifier: one past both the item count and the highest numeric id.
pub fn next_id<S: AsRef<str>>(existing: &[S]) -> String {
    let max_numeric = existing
        .iter()
        .filter_map(|id| id.as_ref().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max_numeric.max(existing.len() as u64) + 1).to_string()
}

/// Numeric ids in numeric order, anything else after them lexically.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub async fn insert<C: ConnectionTrait>(db: &C, row: Model) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(row.id),
        name: Set(row.name),
        description: Set(row.description),
        link: Set(row.link),
        image: Set(row.image),
        category: Set(row.category),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_ids<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, errors::ModelError> {
    let rows = Entity::find().all(db).await?;
    Ok(rows.into_iter().map(|m| m.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_counts_up_from_existing() {
        let none: [&str; 0] = [];
        assert_eq!(next_id(&none), "1");
        assert_eq!(next_id(&["1", "2", "3"]), "4");
        // a deleted middle id never makes the next id collide
        assert_eq!(next_id(&["1", "3"]), "4");
        assert_eq!(next_id(&["0"]), "2");
    }

    #[test]
    fn image_extension_is_case_insensitive() {
        assert_eq!(validate_image_extension("Photo.JPG").unwrap(), "jpg");
        assert_eq!(validate_image_extension("a.b.webp").unwrap(), "webp");
        assert!(validate_image_extension("notes.txt").is_err());
        assert!(validate_image_extension("noext").is_err());
        assert!(validate_image_extension("").is_err());
    }

    #[test]
    fn compare_ids_orders_numerically() {
        let mut ids = vec!["10", "2", "x", "1"];
        ids.sort_by(|a, b| compare_ids(a, b));
        assert_eq!(ids, vec!["1", "2", "10", "x"]);
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(validate_required("name", "  Mug ").unwrap(), "Mug");
        assert!(validate_required("name", "   ").is_err());
        assert_eq!(validate_bounded("name", " Mug ", 3).unwrap(), "Mug");
        assert!(validate_bounded("name", "Mugs", 3).is_err());
        // characters, not bytes
        assert!(validate_bounded("name", "Baño", 4).is_ok());
        assert_eq!(normalize_description(Some("  ")), None);
        assert_eq!(normalize_description(Some(" blue ")), Some("blue".into()));
    }
}
