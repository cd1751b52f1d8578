use crate::api::server::AppState;
use actix_web::{
    web::{self, get, Data},
    HttpResponse, Scope,
};
use serde_json::json;

async fn get_prometheus_metrics(app_state: Data<AppState>) -> HttpResponse {
    match app_state.metrics.export_metrics() {
        Ok(metrics) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(metrics),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "error": format!("Failed to export metrics: {e}")
        })),
    }
}

pub(crate) fn metrics_routes() -> Scope {
    web::scope("/metrics").route("", get().to(get_prometheus_metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::helper::create_test_app_state;
    use crate::metrics::ScanMetrics;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::App;

    #[actix_web::test]
    async fn test_metrics_exported_as_text() {
        let app_state = create_test_app_state();
        app_state.metrics.record_scan("worker-0", true);

        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .service(metrics_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("firmware_scan_total{node=\"worker-0\",status=\"success\"} 1"));
    }
}
