use crate::api::server::AppState;
use crate::catalog::CatalogStatus;
use actix_web::{
    web::{self, get, Data},
    HttpResponse, Scope,
};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    responses(
        (status = 200, description = "Catalog source, size and freshness", body = CatalogStatus),
        (status = 404, description = "Catalog enrichment is disabled")
    ),
    tag = "catalog"
)]
pub(crate) async fn get_catalog_status(app_state: Data<AppState>) -> HttpResponse {
    match &app_state.catalog {
        Some(catalog) => {
            HttpResponse::Ok().json(json!({"success": true, "catalog": catalog.status()}))
        }
        None => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Catalog is disabled"
        })),
    }
}

pub(crate) fn catalog_routes() -> Scope {
    web::scope("/catalog").route("", get().to(get_catalog_status))
}
