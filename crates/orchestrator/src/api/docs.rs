use actix_web::{web, HttpResponse, Scope};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::routes::nodes::get_nodes,
        crate::api::routes::nodes::get_node_firmware,
        crate::api::routes::nodes::get_node_health,
        crate::api::routes::nodes::get_node_thermal,
        crate::api::routes::nodes::get_node_power,
        crate::api::routes::nodes::get_node_events,
        crate::api::routes::updates::get_updates,
        crate::api::routes::events::get_events,
        crate::api::routes::dashboard::get_dashboard,
        crate::api::routes::dashboard::get_namespaces,
        crate::api::routes::catalog::get_catalog_status,
    ),
    components(schemas(
        shared::models::NodeSnapshot,
        shared::models::FirmwareComponent,
        shared::models::HealthRollup,
        shared::models::ThermalSummary,
        shared::models::PowerSummary,
        shared::models::HealthEvent,
        shared::models::UpdateSummary,
        shared::models::DashboardStats,
        crate::catalog::CatalogStatus,
    )),
    tags(
        (name = "nodes", description = "Per-host firmware and health snapshots"),
        (name = "fleet", description = "Fleet-wide projections"),
        (name = "catalog", description = "Vendor firmware catalog state")
    )
)]
pub(crate) struct ApiDoc;

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub(crate) fn docs_routes() -> Scope {
    web::scope("/api-docs").route("/openapi.json", web::get().to(openapi_json))
}
