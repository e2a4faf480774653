use axum::extract::State;
use axum::Json;
use service::registry::Snapshot;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/api/snapshot", tag = "registry",
    responses(
        (status = 200, description = "Items, reservations and categories"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn snapshot(State(state): State<ServerState>) -> Result<Json<Snapshot>, JsonApiError> {
    Ok(Json(state.snapshot.try_load_snapshot().await?))
}

#[utoipa::path(
    get, path = "/api/categories", tag = "registry",
    responses(
        (status = 200, description = "Category names, sorted"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn categories(State(state): State<ServerState>) -> Result<Json<Vec<String>>, JsonApiError> {
    Ok(Json(state.items.list_categories().await?))
}
