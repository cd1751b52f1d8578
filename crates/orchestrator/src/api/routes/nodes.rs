use crate::api::server::AppState;
use actix_web::{
    web::{self, get, Data, Path, Query},
    HttpResponse, Scope,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::models::NodeSnapshot;

const NODE_EVENT_LIMIT: usize = 50;

#[derive(Deserialize)]
pub(crate) struct NamespaceQuery {
    namespace: Option<String>,
}

impl NamespaceQuery {
    /// Requested namespace; empty selects all of them.
    pub(crate) fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }
}

fn node_not_found(name: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": format!("Node {name} not found")
    }))
}

/// Looks up a node and renders `project` of it, or a 404.
fn with_node(
    app_state: &AppState,
    name: &str,
    project: impl FnOnce(NodeSnapshot) -> Value,
) -> HttpResponse {
    match app_state.store_context.node_store.get_node(name) {
        Some(node) => HttpResponse::Ok().json(project(node)),
        None => node_not_found(name),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes",
    params(
        ("namespace" = Option<String>, Query, description = "Only nodes in this namespace")
    ),
    responses(
        (status = 200, description = "Latest snapshot of every node", body = [NodeSnapshot])
    ),
    tag = "nodes"
)]
pub(crate) async fn get_nodes(
    query: Query<NamespaceQuery>,
    app_state: Data<AppState>,
) -> HttpResponse {
    let nodes = app_state
        .store_context
        .node_store
        .list_nodes_by_namespace(query.namespace());
    HttpResponse::Ok().json(json!({"success": true, "nodes": nodes}))
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes/{name}/firmware",
    params(("name" = String, Path, description = "Host name")),
    responses(
        (status = 200, description = "Snapshot including the firmware list", body = NodeSnapshot),
        (status = 404, description = "Node not found")
    ),
    tag = "nodes"
)]
pub(crate) async fn get_node_firmware(name: Path<String>, app_state: Data<AppState>) -> HttpResponse {
    with_node(&app_state, &name, |node| json!({"success": true, "node": node}))
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes/{name}/health",
    params(("name" = String, Path, description = "Host name")),
    responses(
        (status = 200, description = "Overall health and per-subsystem rollup"),
        (status = 404, description = "Node not found")
    ),
    tag = "nodes"
)]
pub(crate) async fn get_node_health(name: Path<String>, app_state: Data<AppState>) -> HttpResponse {
    with_node(&app_state, &name, |node| {
        json!({
            "success": true,
            "health": node.health,
            "healthRollup": node.health_rollup
        })
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes/{name}/thermal",
    params(("name" = String, Path, description = "Host name")),
    responses(
        (status = 200, description = "Thermal summary, null when the controller had none"),
        (status = 404, description = "Node not found")
    ),
    tag = "nodes"
)]
pub(crate) async fn get_node_thermal(name: Path<String>, app_state: Data<AppState>) -> HttpResponse {
    with_node(&app_state, &name, |node| {
        json!({"success": true, "thermal": node.thermal_summary})
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes/{name}/power",
    params(("name" = String, Path, description = "Host name")),
    responses(
        (status = 200, description = "Power summary, null when the controller had none"),
        (status = 404, description = "Node not found")
    ),
    tag = "nodes"
)]
pub(crate) async fn get_node_power(name: Path<String>, app_state: Data<AppState>) -> HttpResponse {
    with_node(&app_state, &name, |node| {
        json!({"success": true, "power": node.power_summary})
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/nodes/{name}/events",
    params(("name" = String, Path, description = "Host name")),
    responses(
        (status = 200, description = "Newest events recorded for the node"),
        (status = 404, description = "Node not found")
    ),
    tag = "nodes"
)]
pub(crate) async fn get_node_events(name: Path<String>, app_state: Data<AppState>) -> HttpResponse {
    with_node(&app_state, &name, |node| {
        let events = app_state
            .store_context
            .event_store
            .list_events(NODE_EVENT_LIMIT, Some(&node.name));
        json!({"success": true, "events": events})
    })
}

pub(crate) fn nodes_routes() -> Scope {
    web::scope("/nodes")
        .route("", get().to(get_nodes))
        .route("/{name}/firmware", get().to(get_node_firmware))
        .route("/{name}/health", get().to(get_node_health))
        .route("/{name}/thermal", get().to(get_node_thermal))
        .route("/{name}/power", get().to(get_node_power))
        .route("/{name}/events", get().to(get_node_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::helper::{create_test_app_state, snapshot};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::App;
    use chrono::Utc;
    use shared::models::{HealthEvent, HealthStatus, ThermalSummary};

    #[actix_web::test]
    async fn test_get_nodes_filters_by_namespace() {
        let app_state = create_test_app_state();
        let nodes = &app_state.store_context.node_store;
        nodes.set_node(snapshot("worker-1", "rack-b"));
        nodes.set_node(snapshot("worker-0", "rack-a"));
        nodes.set_node(snapshot("worker-2", "rack-a"));

        let app = test::init_service(App::new().app_data(app_state.clone()).service(nodes_routes())).await;

        let req = test::TestRequest::get().uri("/nodes?namespace=rack-a").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["success"], Value::Bool(true));
        let names: Vec<&str> = json["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["worker-0", "worker-2"]);

        let req = test::TestRequest::get().uri("/nodes").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_unknown_node_is_not_found() {
        let app_state = create_test_app_state();
        let app = test::init_service(App::new().app_data(app_state.clone()).service(nodes_routes())).await;

        for path in ["firmware", "health", "thermal", "power", "events"] {
            let req = test::TestRequest::get()
                .uri(&format!("/nodes/ghost/{path}"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[actix_web::test]
    async fn test_node_projections() {
        let app_state = create_test_app_state();
        let mut node = snapshot("worker-0", "rack-a");
        node.health = HealthStatus::Warning;
        node.thermal_summary = Some(ThermalSummary {
            inlet_temp_c: 22,
            max_temp_c: 61,
            fan_count: 6,
            fans_healthy: 5,
            status: HealthStatus::Warning,
        });
        app_state.store_context.node_store.set_node(node);
        app_state.store_context.event_store.add_events(
            "worker-0",
            vec![HealthEvent {
                id: "1".to_string(),
                timestamp: Utc::now(),
                severity: HealthStatus::Warning,
                message: "Fan 3 RPM below threshold".to_string(),
                node_name: String::new(),
            }],
        );

        let app = test::init_service(App::new().app_data(app_state.clone()).service(nodes_routes())).await;

        let req = test::TestRequest::get().uri("/nodes/worker-0/health").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["health"], "Warning");
        assert_eq!(json["healthRollup"], Value::Null);

        let req = test::TestRequest::get().uri("/nodes/worker-0/thermal").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["thermal"]["maxTempC"], 61);

        let req = test::TestRequest::get().uri("/nodes/worker-0/power").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["power"], Value::Null);

        let req = test::TestRequest::get().uri("/nodes/worker-0/events").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["events"][0]["nodeName"], "worker-0");

        let req = test::TestRequest::get().uri("/nodes/worker-0/firmware").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["node"]["namespace"], "rack-a");
    }
}
