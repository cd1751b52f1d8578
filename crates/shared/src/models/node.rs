use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::firmware::FirmwareComponent;
use super::health::{HealthRollup, HealthStatus, PowerSummary, ThermalSummary};
use super::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    UpToDate,
    NeedsUpdate,
    #[default]
    Unknown,
    AuthFailed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UpToDate => "up-to-date",
            Self::NeedsUpdate => "needs-update",
            Self::Unknown => "unknown",
            Self::AuthFailed => "auth-failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum PowerState {
    On,
    Off,
    #[default]
    Unknown,
}

impl PowerState {
    pub fn from_redfish(state: Option<&str>) -> Self {
        match state {
            Some("On") => Self::On,
            Some("Off") => Self::Off,
            _ => Self::Unknown,
        }
    }
}

/// Latest known state of one host. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub name: String,
    pub namespace: String,
    pub bmc_address: String,
    pub model: String,
    pub manufacturer: String,
    pub service_tag: String,
    pub power_state: PowerState,
    pub last_scanned: DateTime<Utc>,
    pub status: NodeStatus,
    pub firmware_count: usize,
    pub updates_available: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub firmware: Vec<FirmwareComponent>,
    pub health: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_rollup: Option<HealthRollup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_summary: Option<ThermalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_summary: Option<PowerSummary>,
}

impl NodeSnapshot {
    /// Snapshot recorded when the controller could not be read at all.
    pub fn unreachable(host: &Host, status: NodeStatus) -> Self {
        Self {
            name: host.name.clone(),
            namespace: host.namespace.clone(),
            bmc_address: host.bmc_address.clone(),
            last_scanned: Utc::now(),
            status,
            ..Default::default()
        }
    }

    /// Sets the firmware list and derives the counters and status from it.
    pub fn with_firmware(mut self, firmware: Vec<FirmwareComponent>) -> Self {
        self.updates_available = firmware.iter().filter(|fw| fw.needs_update()).count();
        self.firmware_count = firmware.len();
        self.status = if self.updates_available > 0 {
            NodeStatus::NeedsUpdate
        } else {
            NodeStatus::UpToDate
        };
        self.firmware = firmware;
        self
    }
}
