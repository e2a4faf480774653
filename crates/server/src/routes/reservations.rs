use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use common::types::Success;
use serde::{Deserialize, Serialize};
use service::registry::ReservationMap;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Item ids arrive either as strings or as bare numbers from older pages.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ItemRef {
    Text(String),
    Number(u64),
}

impl ItemRef {
    pub fn into_id(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    #[serde(default)]
    pub item_id: Option<ItemRef>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub success: bool,
    pub reservations: ReservationMap,
}

#[utoipa::path(
    get, path = "/api/reservations", tag = "reservations",
    responses(
        (status = 200, description = "Reservations keyed by item id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ReservationMap>, JsonApiError> {
    Ok(Json(state.reservations.list().await?))
}

#[utoipa::path(
    post, path = "/api/reservations", tag = "reservations",
    request_body = crate::openapi::ReserveRequestDoc,
    responses(
        (status = 200, description = "Reserved; body carries every reservation"),
        (status = 400, description = "Missing field or item already reserved"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn reserve(
    State(state): State<ServerState>,
    payload: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<Json<ReserveResponse>, JsonApiError> {
    let Json(req) = payload?;
    let item_id = req.item_id.map(ItemRef::into_id).unwrap_or_default();
    let reservations = state.reservations.reserve(&item_id, &req.name, &req.contact).await?;
    info!(%item_id, total = reservations.len(), "reserve ok");
    Ok(Json(ReserveResponse { success: true, reservations }))
}

#[utoipa::path(
    delete, path = "/api/reservations/{item_id}", tag = "reservations",
    params(("item_id" = String, Path, description = "Reserved item id")),
    responses(
        (status = 200, description = "Reservation removed"),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Item was not reserved")
    )
)]
pub async fn unreserve(
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
) -> Result<Json<Success>, JsonApiError> {
    state.reservations.unreserve(&item_id).await?;
    Ok(Json(Success::default()))
}
