use crate::api::routes::nodes::NamespaceQuery;
use crate::api::server::AppState;
use actix_web::{
    web::{self, get, Data, Query},
    HttpResponse, Scope,
};
use serde_json::json;
use shared::models::DashboardStats;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(
        ("namespace" = Option<String>, Query, description = "Only nodes in this namespace")
    ),
    responses(
        (status = 200, description = "Fleet health, power and update counts", body = DashboardStats)
    ),
    tag = "fleet"
)]
pub(crate) async fn get_dashboard(
    query: Query<NamespaceQuery>,
    app_state: Data<AppState>,
) -> HttpResponse {
    let nodes = app_state
        .store_context
        .node_store
        .list_nodes_by_namespace(query.namespace());
    let dashboard = DashboardStats {
        last_refresh: app_state.heartbeats.last_cycle(),
        next_refresh: app_state.heartbeats.next_cycle(),
        ..DashboardStats::from_nodes(&nodes)
    };
    HttpResponse::Ok().json(json!({"success": true, "dashboard": dashboard}))
}

#[utoipa::path(
    get,
    path = "/api/v1/namespaces",
    responses(
        (status = 200, description = "Distinct namespaces of known nodes, sorted")
    ),
    tag = "fleet"
)]
pub(crate) async fn get_namespaces(app_state: Data<AppState>) -> HttpResponse {
    let namespaces = app_state.store_context.node_store.namespaces();
    HttpResponse::Ok().json(json!({"success": true, "namespaces": namespaces}))
}

pub(crate) fn dashboard_routes() -> Scope {
    web::scope("/dashboard").route("", get().to(get_dashboard))
}

pub(crate) fn namespaces_routes() -> Scope {
    web::scope("/namespaces").route("", get().to(get_namespaces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::helper::{create_test_app_state, snapshot};
    use actix_web::test;
    use actix_web::App;
    use serde_json::Value;
    use shared::models::{FirmwareComponent, HealthStatus, PowerState, Severity};

    fn pending(severity: Severity) -> FirmwareComponent {
        FirmwareComponent {
            id: "idrac".to_string(),
            name: "Integrated Dell Remote Access Controller".to_string(),
            current_version: "6.00.00.00".to_string(),
            available_version: "6.10.30.00".to_string(),
            updateable: true,
            component_type: "BMC".to_string(),
            severity: Some(severity),
        }
    }

    #[actix_web::test]
    async fn test_dashboard_counts() {
        let app_state = create_test_app_state();
        let nodes = &app_state.store_context.node_store;

        let mut a = snapshot("a", "rack-a").with_firmware(vec![pending(Severity::Critical)]);
        a.health = HealthStatus::Ok;
        a.power_state = PowerState::On;
        let mut b = snapshot("b", "rack-a").with_firmware(vec![pending(Severity::Optional)]);
        b.health = HealthStatus::Critical;
        b.power_state = PowerState::Off;
        let mut c = snapshot("c", "rack-b");
        c.health = HealthStatus::Warning;
        c.power_state = PowerState::On;
        nodes.set_node(a);
        nodes.set_node(b);
        nodes.set_node(c);
        app_state.heartbeats.update_poller();

        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .service(dashboard_routes())
                .service(namespaces_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        let dashboard = &json["dashboard"];
        assert_eq!(dashboard["totalNodes"], 3);
        assert_eq!(dashboard["healthSummary"]["healthy"], 1);
        assert_eq!(dashboard["healthSummary"]["warning"], 1);
        assert_eq!(dashboard["healthSummary"]["critical"], 1);
        assert_eq!(dashboard["powerSummary"]["on"], 2);
        assert_eq!(dashboard["updatesSummary"]["total"], 2);
        assert_eq!(dashboard["updatesSummary"]["critical"], 1);
        assert_eq!(dashboard["updatesSummary"]["nodesWithUpdates"], 2);
        assert!(dashboard["lastRefresh"].is_string());
        assert!(dashboard["nextRefresh"].is_string());

        let req = test::TestRequest::get()
            .uri("/dashboard?namespace=rack-b")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["dashboard"]["totalNodes"], 1);

        let req = test::TestRequest::get().uri("/namespaces").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["namespaces"], serde_json::json!(["rack-a", "rack-b"]));
    }
}
