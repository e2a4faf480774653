use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use common::types::Success;
use models::item;
use serde::Serialize;
use service::registry::ItemInput;
use service::storage::image_store::ImageUpload;
use tracing::{debug, info};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Fields of the admin item form, as parsed from `multipart/form-data`.
#[derive(Debug, Default)]
pub struct ItemForm {
    pub name: String,
    pub description: Option<String>,
    pub link: String,
    pub category: String,
    pub image: Option<ImageUpload>,
}

impl ItemForm {
    /// A file part with no name and no content counts as "no image".
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, JsonApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else { continue };
            match name.as_str() {
                "name" => form.name = field.text().await?,
                "description" => form.description = Some(field.text().await?),
                "link" => form.link = field.text().await?,
                "category" => form.category = field.text().await?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    if !file_name.is_empty() || !bytes.is_empty() {
                        form.image = Some(ImageUpload { file_name, bytes: bytes.to_vec() });
                    }
                }
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    pub fn into_parts(self) -> (ItemInput, Option<ImageUpload>) {
        let input = ItemInput {
            name: self.name,
            description: self.description,
            link: self.link,
            category: self.category,
        };
        (input, self.image)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedItem {
    pub success: bool,
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: item::Model,
}

#[utoipa::path(
    get, path = "/api/items", tag = "items",
    responses(
        (status = 200, description = "All items in id order"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<item::Model>>, JsonApiError> {
    Ok(Json(state.items.list_items().await?))
}

#[utoipa::path(
    get, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item found"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<item::Model>, JsonApiError> {
    Ok(Json(state.items.get_item(&id).await?))
}

#[utoipa::path(
    post, path = "/api/items", tag = "items",
    request_body(content = crate::openapi::ItemFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created; body carries the new id"),
        (status = 400, description = "Missing field or disallowed image type"),
        (status = 401, description = "Missing or invalid admin key")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreatedItem>, JsonApiError> {
    let (input, image) = ItemForm::from_multipart(multipart?).await?.into_parts();
    let created = state.items.create_item(input, image).await?;
    info!(item_id = %created.id, "create item ok");
    Ok(Json(CreatedItem { success: true, item_id: created.id }))
}

#[utoipa::path(
    put, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item id")),
    request_body(content = crate::openapi::ItemFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Missing field or disallowed image type"),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ItemResponse>, JsonApiError> {
    let (input, image) = ItemForm::from_multipart(multipart?).await?.into_parts();
    let item = state.items.update_item(&id, input, image).await?;
    Ok(Json(ItemResponse { success: true, item }))
}

#[utoipa::path(
    delete, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Deleted with its reservation and image"),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, JsonApiError> {
    state.items.delete_item(&id).await?;
    Ok(Json(Success::default()))
}
