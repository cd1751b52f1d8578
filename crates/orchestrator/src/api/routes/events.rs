use crate::api::server::AppState;
use actix_web::{
    web::{self, get, Data, Query},
    HttpResponse, Scope,
};
use serde::Deserialize;
use serde_json::json;
use shared::models::HealthEvent;

const DEFAULT_EVENT_LIMIT: usize = 100;

#[derive(Deserialize)]
pub(crate) struct EventQuery {
    limit: Option<usize>,
    node: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum events returned, newest first (default 100, 0 for all)"),
        ("node" = Option<String>, Query, description = "Only events from this node")
    ),
    responses(
        (status = 200, description = "Recorded health events, newest first", body = [HealthEvent])
    ),
    tag = "fleet"
)]
pub(crate) async fn get_events(query: Query<EventQuery>, app_state: Data<AppState>) -> HttpResponse {
    let node = query.node.as_deref().filter(|node| !node.is_empty());
    let events = app_state
        .store_context
        .event_store
        .list_events(query.limit.unwrap_or(DEFAULT_EVENT_LIMIT), node);
    HttpResponse::Ok().json(json!({"success": true, "events": events}))
}

pub(crate) fn events_routes() -> Scope {
    web::scope("/events").route("", get().to(get_events))
}
