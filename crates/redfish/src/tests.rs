use mockito::{Mock, Server, ServerGuard};
use serde_json::{json, Value};
use shared::models::{BmcCredentials, HealthStatus, PowerState, Redundancy};

use crate::{ManagementClient, RedfishClient, RedfishError, DEFAULT_TIMEOUT};

fn credentials() -> BmcCredentials {
    BmcCredentials::new("root", "calvin")
}

fn client() -> RedfishClient {
    RedfishClient::new(DEFAULT_TIMEOUT).unwrap()
}

async fn serve(server: &mut ServerGuard, path: &str, body: Value) -> Mock {
    server
        .mock("GET", path)
        .match_header("authorization", "Basic cm9vdDpjYWx2aW4=")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn serve_times(server: &mut ServerGuard, path: &str, hits: usize, body: Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn missing(server: &mut ServerGuard, path: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(404)
        .create_async()
        .await
}

fn link(path: &str) -> Value {
    json!({ "@odata.id": path })
}

/// A rack chassis preceded by an enclosure, so selection has to skip one.
async fn serve_chassis(server: &mut ServerGuard, main: Value) -> Mock {
    serve(
        server,
        "/redfish/v1/Chassis",
        json!({ "Members": [
            { "Id": "Enclosure.Internal.0-1", "ChassisType": "Enclosure",
              "Thermal": link("/redfish/v1/Chassis/Enclosure/Thermal") },
            main,
        ]}),
    )
    .await
}

#[tokio::test]
async fn reads_inventory_and_identity() {
    let mut server = Server::new_async().await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Systems",
        json!({ "Members": [link("/redfish/v1/Systems/System.Embedded.1")] }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Systems/System.Embedded.1",
        json!({
            "Model": "PowerEdge R640",
            "Manufacturer": "Dell Inc.",
            "SKU": "ABC1234",
            "PowerState": "On",
            "Status": { "Health": "OK" }
        }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/UpdateService",
        json!({ "FirmwareInventory": link("/redfish/v1/UpdateService/FirmwareInventory") }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/UpdateService/FirmwareInventory",
        json!({ "Members": [
            link("/redfish/v1/UpdateService/FirmwareInventory/Installed-159-2.19.1"),
            { "Id": "Installed-25227-6.10.30.00", "Name": "Integrated Dell Remote Access Controller iDRAC",
              "Version": "6.10.30.00", "Updateable": true },
        ]}),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/UpdateService/FirmwareInventory/Installed-159-2.19.1",
        json!({ "Id": "Installed-159-2.19.1", "Name": "BIOS", "Version": "2.19.1", "Updateable": true }),
    )
    .await;

    let inventory = client()
        .get_inventory(&server.url(), &credentials())
        .await
        .unwrap();

    let system = inventory.system.unwrap();
    assert_eq!(system.model, "PowerEdge R640");
    assert_eq!(system.manufacturer, "Dell Inc.");
    assert_eq!(system.service_tag, "ABC1234");
    assert_eq!(system.power_state, PowerState::On);

    assert_eq!(inventory.firmware.len(), 2);
    assert_eq!(inventory.firmware[0].component_type, "BIOS");
    assert_eq!(inventory.firmware[0].current_version, "2.19.1");
    assert_eq!(inventory.firmware[1].component_type, "BMC");
    assert!(inventory.firmware.iter().all(|fw| fw.available_version.is_empty()));
}

#[tokio::test]
async fn rejected_credentials_are_auth_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/redfish/v1/Systems")
        .with_status(401)
        .create_async()
        .await;

    let err = client()
        .get_inventory(&server.url(), &credentials())
        .await
        .unwrap_err();
    assert!(err.is_auth(), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_controller_is_transport_error() {
    // Nothing listens on port 9 of localhost.
    let err = client()
        .get_inventory("http://127.0.0.1:9", &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishError::Transport { .. }));
}

#[tokio::test]
async fn thermal_falls_back_to_legacy_resource_once() {
    let mut server = Server::new_async().await;
    let _mock = serve_chassis(
        &mut server,
        json!({
            "Id": "System.Embedded.1", "ChassisType": "RackMount",
            "ThermalSubsystem": link("/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem"),
            "Thermal": link("/redfish/v1/Chassis/System.Embedded.1/Thermal"),
        }),
    )
    .await;
    let _mock = missing(&mut server, "/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem").await;
    let legacy = serve_times(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/Thermal",
        1,
        json!({
            "Temperatures": [
                { "Name": "System Board Inlet Temp", "ReadingCelsius": 23.0, "Status": { "Health": "OK" } },
                { "Name": "CPU1 Temp", "ReadingCelsius": 58.0, "Status": { "Health": "OK" } }
            ],
            "Fans": [
                { "Name": "Fan1A", "Reading": 5880.0, "Status": { "Health": "OK" } },
                { "Name": "Fan2A", "Reading": 0.0, "Status": { "Health": "Critical" } }
            ]
        }),
    )
    .await;
    let enclosure = server
        .mock("GET", "/redfish/v1/Chassis/Enclosure/Thermal")
        .expect(0)
        .create_async()
        .await;

    let (detail, summary) = client()
        .get_thermal_data(&server.url(), &credentials())
        .await
        .unwrap();

    assert_eq!(detail.temperatures.len(), 2);
    assert_eq!(detail.fans.len(), 2);
    assert_eq!(summary.inlet_temp_c, 23);
    assert_eq!(summary.max_temp_c, 58);
    assert_eq!(summary.fan_count, 2);
    assert_eq!(summary.fans_healthy, 1);
    assert_eq!(summary.status, HealthStatus::Warning);
    legacy.assert_async().await;
    enclosure.assert_async().await;
}

#[tokio::test]
async fn thermal_prefers_modern_subsystem() {
    let mut server = Server::new_async().await;
    let _mock = serve_chassis(
        &mut server,
        json!({
            "Id": "System.Embedded.1", "ChassisType": "RackMount",
            "ThermalSubsystem": link("/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem"),
            "Thermal": link("/redfish/v1/Chassis/System.Embedded.1/Thermal"),
        }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem",
        json!({
            "ThermalMetrics": link("/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem/ThermalMetrics"),
            "Fans": link("/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem/Fans"),
        }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem/ThermalMetrics",
        json!({ "TemperatureReadingsCelsius": [
            { "DeviceName": "System Board Inlet Temp", "Reading": 21.0 },
            { "DeviceName": "CPU2 Temp", "Reading": 64.0 }
        ]}),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/ThermalSubsystem/Fans",
        json!({ "Members": [
            { "Name": "Fan 1", "SpeedPercent": { "Reading": 34.0 }, "Status": { "Health": "OK" } }
        ]}),
    )
    .await;
    let legacy = server
        .mock("GET", "/redfish/v1/Chassis/System.Embedded.1/Thermal")
        .expect(0)
        .create_async()
        .await;

    let (detail, summary) = client()
        .get_thermal_data(&server.url(), &credentials())
        .await
        .unwrap();

    assert_eq!(detail.fans[0].rpm, 34);
    assert_eq!(summary.inlet_temp_c, 21);
    assert_eq!(summary.max_temp_c, 64);
    assert_eq!(summary.status, HealthStatus::Ok);
    legacy.assert_async().await;
}

#[tokio::test]
async fn power_uses_legacy_when_modern_collection_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = serve_chassis(
        &mut server,
        json!({
            "Id": "System.Embedded.1", "ChassisType": "RackMount",
            "PowerSubsystem": link("/redfish/v1/Chassis/System.Embedded.1/PowerSubsystem"),
            "Power": link("/redfish/v1/Chassis/System.Embedded.1/Power"),
            "EnvironmentMetrics": link("/redfish/v1/Chassis/System.Embedded.1/EnvironmentMetrics"),
        }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/PowerSubsystem",
        json!({ "PowerSupplies": link("/redfish/v1/Chassis/System.Embedded.1/PowerSubsystem/PowerSupplies") }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/PowerSubsystem/PowerSupplies",
        json!({ "Members": [] }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/EnvironmentMetrics",
        json!({ "PowerWatts": { "Reading": 412.0 } }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/Power",
        json!({
            "PowerControl": [ { "PowerConsumedWatts": 400.0 } ],
            "PowerSupplies": [
                { "Name": "PS1 Status", "PowerCapacityWatts": 1100.0, "Status": { "Health": "OK" } },
                { "Name": "PS2 Status", "PowerCapacityWatts": 1100.0, "Status": { "Health": "Critical" } }
            ]
        }),
    )
    .await;

    let (detail, summary) = client()
        .get_power_data(&server.url(), &credentials())
        .await
        .unwrap();

    assert_eq!(detail.current_watts, 412);
    assert_eq!(detail.psus.len(), 2);
    assert_eq!(detail.psus[0].capacity_w, 1100);
    assert_eq!(summary.psu_count, 2);
    assert_eq!(summary.psus_healthy, 1);
    assert_eq!(summary.redundancy, Redundancy::Lost);
    assert_eq!(summary.status, HealthStatus::Critical);
}

#[tokio::test]
async fn power_without_any_source_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = serve_chassis(
        &mut server,
        json!({ "Id": "System.Embedded.1", "ChassisType": "StandAlone" }),
    )
    .await;

    let err = client()
        .get_power_data(&server.url(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishError::NoData("power")));
}

#[tokio::test]
async fn health_rollup_reduces_each_subsystem() {
    let mut server = Server::new_async().await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Systems",
        json!({ "Members": [{
            "Status": { "Health": "Warning" },
            "Processors": link("/redfish/v1/Systems/1/Processors"),
            "Memory": link("/redfish/v1/Systems/1/Memory"),
            "Storage": link("/redfish/v1/Systems/1/Storage"),
        }]}),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Systems/1/Processors",
        json!({ "Members": [
            { "Status": { "Health": "OK" } },
            { "Status": { "Health": "OK" } }
        ]}),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Systems/1/Memory",
        json!({ "Members": [
            { "Status": { "Health": "OK" } },
            { "Status": { "Health": "Warning" } }
        ]}),
    )
    .await;
    let _mock = missing(&mut server, "/redfish/v1/Systems/1/Storage").await;
    let _mock = serve_chassis(
        &mut server,
        json!({
            "Id": "System.Embedded.1", "ChassisType": "RackMount",
            "Thermal": link("/redfish/v1/Chassis/System.Embedded.1/Thermal"),
        }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Chassis/System.Embedded.1/Thermal",
        json!({ "Fans": [ { "Name": "Fan1A", "Reading": 5000.0, "Status": { "Health": "Critical" } } ] }),
    )
    .await;

    let (rollup, overall) = client()
        .get_health_rollup(&server.url(), &credentials())
        .await
        .unwrap();

    assert_eq!(overall, HealthStatus::Warning);
    assert_eq!(rollup.processors, HealthStatus::Ok);
    assert_eq!(rollup.memory, HealthStatus::Warning);
    assert_eq!(rollup.storage, HealthStatus::Unknown);
    assert_eq!(rollup.network, HealthStatus::Unknown);
    assert_eq!(rollup.fans, HealthStatus::Critical);
    assert_eq!(rollup.power_supplies, HealthStatus::Unknown);
}

#[tokio::test]
async fn events_come_from_the_system_event_log() {
    let mut server = Server::new_async().await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Managers",
        json!({ "Members": [{ "LogServices": link("/redfish/v1/Managers/iDRAC.Embedded.1/LogServices") }] }),
    )
    .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Managers/iDRAC.Embedded.1/LogServices",
        json!({ "Members": [
            { "Id": "Lclog", "Entries": link("/redfish/v1/Managers/iDRAC.Embedded.1/LogServices/Lclog/Entries") },
            { "Id": "Sel", "Entries": link("/redfish/v1/Managers/iDRAC.Embedded.1/LogServices/Sel/Entries") }
        ]}),
    )
    .await;
    let lifecycle = server
        .mock("GET", "/redfish/v1/Managers/iDRAC.Embedded.1/LogServices/Lclog/Entries")
        .expect(0)
        .create_async()
        .await;
    let _mock = serve(
        &mut server,
        "/redfish/v1/Managers/iDRAC.Embedded.1/LogServices/Sel/Entries",
        json!({ "Members": [
            { "Id": "3", "Created": "2025-01-02T10:00:00-06:00", "Severity": "Critical", "Message": "PSU 2 lost input" },
            { "Id": "2", "Created": "not a timestamp", "Severity": "Warning", "Message": "Fan 2A low" },
            { "Id": "1", "Created": "2025-01-01T00:00:00Z", "Severity": "OK", "Message": "Log cleared" }
        ]}),
    )
    .await;

    let events = client()
        .get_events(&server.url(), &credentials(), 2)
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "3");
    assert_eq!(events[0].severity, HealthStatus::Critical);
    assert_eq!(events[0].timestamp.to_rfc3339(), "2025-01-02T16:00:00+00:00");
    assert_eq!(events[1].severity, HealthStatus::Warning);
    lifecycle.assert_async().await;
}
