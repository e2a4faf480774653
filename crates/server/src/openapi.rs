use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ReserveRequestDoc {
    /// String or number.
    #[schema(example = "1")]
    pub item_id: String,
    pub name: String,
    pub contact: String,
}

#[derive(ToSchema)]
pub struct ItemFormDoc {
    pub name: String,
    pub description: Option<String>,
    pub link: String,
    pub category: String,
    /// png, jpg, jpeg, gif or webp; optional on update.
    #[schema(format = Binary)]
    pub image: String,
}

#[derive(ToSchema)]
pub struct ItemDoc {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub link: String,
    pub image: String,
    pub category: String,
}

#[derive(ToSchema)]
pub struct ReservationDoc {
    pub name: String,
    pub contact: String,
    /// RFC 3339 in the registry offset, e.g. 2024-06-01T12:00:00-03:00.
    pub date: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::registry::snapshot,
        crate::routes::registry::categories,
        crate::routes::items::list,
        crate::routes::items::get,
        crate::routes::items::create,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::reservations::list,
        crate::routes::reservations::reserve,
        crate::routes::reservations::unreserve,
    ),
    components(
        schemas(
            HealthResponse,
            ReserveRequestDoc,
            ItemFormDoc,
            ItemDoc,
            ReservationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "registry"),
        (name = "items"),
        (name = "reservations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_registry_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/snapshot",
            "/api/categories",
            "/api/items",
            "/api/items/{id}",
            "/api/reservations",
            "/api/reservations/{item_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
