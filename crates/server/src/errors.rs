use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::{error, warn};

/// Error body returned by every API handler: `{"error": ..., "title": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    title: &'a str,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.detail.as_deref().unwrap_or(self.title),
            title: self.title,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::Conflict(msg) => {
                warn!(detail = %msg, "request conflicts with registry state");
                Self::new(StatusCode::BAD_REQUEST, "Conflict", Some(msg))
            }
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            internal @ (ServiceError::Db(_) | ServiceError::Storage(_)) => {
                error!(error = %internal, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl From<MultipartRejection> for JsonApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl From<MultipartError> for JsonApiError {
    fn from(e: MultipartError) -> Self {
        Self::bad_request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::Validation("name is required".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("item already reserved".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("item"), StatusCode::NOT_FOUND),
            (ServiceError::Db("disk I/O error".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Storage("permission denied".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let e = JsonApiError::from(ServiceError::Db("secret dsn".into()));
        assert_eq!(e.detail, None);
        assert_eq!(e.title, "Internal Server Error");
    }
}
