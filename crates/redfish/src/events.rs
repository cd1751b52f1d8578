use chrono::{DateTime, Utc};
use log::debug;
use shared::models::{HealthEvent, HealthStatus};

use crate::error::{RedfishError, Result};
use crate::resources::{LogEntry, LogService, Manager};
use crate::session::Session;

fn is_system_event_log(service: &LogService) -> bool {
    service.id == "Sel" || service.id == "SEL"
}

fn to_event(entry: LogEntry) -> HealthEvent {
    let severity = match entry.severity.as_str() {
        "Critical" => HealthStatus::Critical,
        "Warning" => HealthStatus::Warning,
        _ => HealthStatus::Ok,
    };
    let timestamp = DateTime::parse_from_rfc3339(&entry.created)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    HealthEvent {
        id: entry.id,
        timestamp,
        severity,
        message: entry.message,
        node_name: String::new(),
    }
}

/// Entries of the first manager's system event log, in controller order.
pub(crate) async fn read_events(session: &Session<'_>, limit: usize) -> Result<Vec<HealthEvent>> {
    let managers: Vec<Manager> = session.members("/redfish/v1/Managers", 1).await?;
    let manager = managers
        .into_iter()
        .next()
        .ok_or(RedfishError::NoData("manager"))?;
    let services: Vec<LogService> = session
        .follow_members(manager.log_services.as_ref())
        .await?
        .unwrap_or_default();

    let mut events = Vec::new();
    for service in services.iter().filter(|s| is_system_event_log(s)) {
        let Some(entries) = &service.entries else {
            continue;
        };
        let remaining = if limit == 0 {
            0
        } else {
            limit.saturating_sub(events.len())
        };
        if limit > 0 && remaining == 0 {
            break;
        }
        match session.members::<LogEntry>(&entries.odata_id, remaining).await {
            Ok(entries) => events.extend(entries.into_iter().map(to_event)),
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => debug!("skipping log service {}: {e}", service.id),
        }
    }
    Ok(events)
}
