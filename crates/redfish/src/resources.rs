//! Subsets of the Redfish schema read by this crate.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Link {
    #[serde(rename = "@odata.id")]
    pub(crate) odata_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Status {
    #[serde(rename = "Health")]
    pub(crate) health: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Collection {
    #[serde(rename = "Members", default)]
    pub(crate) members: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ComputerSystem {
    #[serde(default)]
    pub(crate) model: String,
    #[serde(default)]
    pub(crate) manufacturer: String,
    #[serde(rename = "SKU", default)]
    pub(crate) sku: String,
    #[serde(default)]
    pub(crate) asset_tag: String,
    pub(crate) power_state: Option<String>,
    #[serde(default)]
    pub(crate) status: Status,
    pub(crate) processors: Option<Link>,
    pub(crate) memory: Option<Link>,
    pub(crate) storage: Option<Link>,
    pub(crate) ethernet_interfaces: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UpdateService {
    pub(crate) firmware_inventory: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SoftwareInventory {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) updateable: bool,
}

/// Any member resource carrying only a `Status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct StatusOnly {
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Chassis {
    #[serde(default)]
    pub(crate) chassis_type: String,
    pub(crate) thermal: Option<Link>,
    pub(crate) thermal_subsystem: Option<Link>,
    pub(crate) power: Option<Link>,
    pub(crate) power_subsystem: Option<Link>,
    pub(crate) environment_metrics: Option<Link>,
}

impl Chassis {
    pub(crate) fn is_main(&self) -> bool {
        matches!(
            self.chassis_type.as_str(),
            "RackMount" | "Blade" | "StandAlone"
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ThermalSubsystem {
    pub(crate) thermal_metrics: Option<Link>,
    pub(crate) fans: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ThermalMetrics {
    #[serde(default)]
    pub(crate) temperature_readings_celsius: Vec<SensorReading>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SensorReading {
    #[serde(default)]
    pub(crate) device_name: String,
    pub(crate) reading: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Fan {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) speed_percent: Option<Excerpt>,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Excerpt {
    pub(crate) reading: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LegacyThermal {
    #[serde(default)]
    pub(crate) temperatures: Vec<LegacyTemperature>,
    #[serde(default)]
    pub(crate) fans: Vec<LegacyFan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LegacyTemperature {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) reading_celsius: Option<f64>,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LegacyFan {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) reading: Option<f64>,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PowerSubsystem {
    pub(crate) power_supplies: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PowerSupply {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) power_capacity_watts: Option<f64>,
    #[serde(default)]
    pub(crate) status: Status,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EnvironmentMetrics {
    pub(crate) power_watts: Option<Excerpt>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LegacyPower {
    #[serde(default)]
    pub(crate) power_control: Vec<PowerControl>,
    #[serde(default)]
    pub(crate) power_supplies: Vec<PowerSupply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PowerControl {
    pub(crate) power_consumed_watts: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Manager {
    pub(crate) log_services: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LogService {
    pub(crate) id: String,
    pub(crate) entries: Option<Link>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LogEntry {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) created: String,
    #[serde(default)]
    pub(crate) severity: String,
    #[serde(default)]
    pub(crate) message: String,
}
