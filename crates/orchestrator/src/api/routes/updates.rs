use crate::api::routes::nodes::NamespaceQuery;
use crate::api::server::AppState;
use actix_web::{
    web::{self, get, Data, Query},
    HttpResponse, Scope,
};
use serde_json::json;
use shared::models::{summarize_updates, UpdateSummary};

#[utoipa::path(
    get,
    path = "/api/v1/updates",
    params(
        ("namespace" = Option<String>, Query, description = "Only nodes in this namespace")
    ),
    responses(
        (status = 200, description = "Pending updates grouped by component type and version", body = [UpdateSummary])
    ),
    tag = "fleet"
)]
pub(crate) async fn get_updates(
    query: Query<NamespaceQuery>,
    app_state: Data<AppState>,
) -> HttpResponse {
    let nodes = app_state
        .store_context
        .node_store
        .list_nodes_by_namespace(query.namespace());
    let updates = summarize_updates(&nodes);
    HttpResponse::Ok().json(json!({"success": true, "updates": updates}))
}

pub(crate) fn updates_routes() -> Scope {
    web::scope("/updates").route("", get().to(get_updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::helper::{create_test_app_state, snapshot};
    use actix_web::test;
    use actix_web::App;
    use serde_json::Value;
    use shared::models::FirmwareComponent;

    fn bios(current: &str, available: &str) -> FirmwareComponent {
        FirmwareComponent {
            id: "bios".to_string(),
            name: "BIOS".to_string(),
            current_version: current.to_string(),
            available_version: available.to_string(),
            updateable: true,
            component_type: "BIOS".to_string(),
            severity: None,
        }
    }

    #[actix_web::test]
    async fn test_updates_grouped_by_type_and_version() {
        let app_state = create_test_app_state();
        let nodes = &app_state.store_context.node_store;
        nodes.set_node(snapshot("b", "rack-a").with_firmware(vec![bios("2.18.1", "2.19.1")]));
        nodes.set_node(snapshot("a", "rack-a").with_firmware(vec![bios("2.17.0", "2.19.1")]));
        nodes.set_node(snapshot("c", "rack-b").with_firmware(vec![bios("2.18.1", "2.19.1")]));
        nodes.set_node(snapshot("d", "rack-a").with_firmware(vec![bios("2.19.1", "2.19.1")]));

        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .service(updates_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/updates?namespace=rack-a")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        let updates = json["updates"].as_array().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0]["componentType"], "BIOS");
        assert_eq!(updates[0]["availableVersion"], "2.19.1");
        assert_eq!(updates[0]["nodeCount"], 2);
        assert_eq!(updates[0]["affectedNodes"], serde_json::json!(["a", "b"]));

        let req = test::TestRequest::get().uri("/updates").to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["updates"][0]["nodeCount"], 3);
    }
}
