use crate::api::docs::docs_routes;
use crate::api::routes::catalog::catalog_routes;
use crate::api::routes::dashboard::{dashboard_routes, namespaces_routes};
use crate::api::routes::events::events_routes;
use crate::api::routes::metrics::metrics_routes;
use crate::api::routes::nodes::nodes_routes;
use crate::api::routes::updates::updates_routes;
use crate::catalog::CatalogService;
use crate::metrics::MetricsContext;
use crate::store::core::StoreContext;
use crate::utils::loop_heartbeats::LoopHeartbeats;
use crate::ServerMode;
use actix_web::middleware::{Compress, NormalizePath, TrailingSlash};
use actix_web::{middleware, web::Data, App, HttpServer};
use actix_web::{web, HttpResponse, Scope};
use anyhow::Error;
use log::info;
use serde_json::json;
use std::sync::Arc;

pub(crate) struct AppState {
    pub(crate) store_context: Arc<StoreContext>,
    pub(crate) heartbeats: Arc<LoopHeartbeats>,
    /// `None` when catalog enrichment is disabled.
    pub(crate) catalog: Option<Arc<CatalogService>>,
    pub(crate) metrics: Arc<MetricsContext>,
}

pub(crate) async fn health(data: Data<AppState>) -> HttpResponse {
    let health_status = data.heartbeats.health_status();
    if health_status.healthy {
        HttpResponse::Ok().json(health_status)
    } else {
        HttpResponse::InternalServerError().json(health_status)
    }
}

pub(crate) async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Resource not found"
    }))
}

/// The read surface under `/api/v1`.
pub(crate) fn api_routes() -> Scope {
    web::scope("/api/v1")
        .service(nodes_routes())
        .service(updates_routes())
        .service(events_routes())
        .service(dashboard_routes())
        .service(namespaces_routes())
        .service(catalog_routes())
}

pub async fn start_server(
    host: &str,
    port: u16,
    store_context: Arc<StoreContext>,
    heartbeats: Arc<LoopHeartbeats>,
    catalog: Option<Arc<CatalogService>>,
    metrics: Arc<MetricsContext>,
    server_mode: ServerMode,
) -> Result<(), Error> {
    info!("Starting server at http://{host}:{port}");
    let app_state = Data::new(AppState {
        store_context,
        heartbeats,
        catalog,
        metrics,
    });

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(Compress::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(web::resource("/health").route(web::get().to(health)))
            .service(metrics_routes());

        if !matches!(server_mode, ServerMode::ProcessorOnly) {
            app = app.service(api_routes()).service(docs_routes());
        }

        app.default_service(web::route().to(not_found))
    })
    .bind((host, port))?
    .run()
    .await?;
    Ok(())
}
