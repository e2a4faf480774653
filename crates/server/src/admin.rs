use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware: when an admin key is configured, item mutations and
/// reservation removal need it in the `X-API-Key` header. Query parameters
/// are not consulted; request URIs end up in access logs.
pub async fn require_admin_key(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let verdict = req
        .headers()
        .get(API_KEY_HEADER)
        .map(|v| keys_match(v.as_bytes(), expected.as_bytes()));
    match verdict {
        Some(true) => Ok(next.run(req).await),
        Some(false) => {
            warn!(method = %req.method(), path = %req.uri().path(), "admin key rejected");
            Err(JsonApiError::unauthorized("invalid API key"))
        }
        None => Err(JsonApiError::unauthorized("missing X-API-Key header")),
    }
}

fn keys_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.ct_eq(expected).into()
}
