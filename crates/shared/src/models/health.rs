use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum HealthStatus {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Critical,
    #[default]
    Unknown,
}

impl HealthStatus {
    /// Maps a Redfish `Status.Health` value. Anything unrecognised is `Unknown`.
    pub fn from_redfish(health: Option<&str>) -> Self {
        match health {
            Some("OK") => Self::Ok,
            Some("Warning") => Self::Warning,
            Some("Critical") => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Worst-of reduction: Critical, then Warning, then Unknown, then OK.
///
/// An empty input yields `Unknown`: no readings is not the same as healthy.
pub fn aggregate_health<I>(statuses: I) -> HealthStatus
where
    I: IntoIterator<Item = HealthStatus>,
{
    let mut seen_any = false;
    let mut worst = HealthStatus::Ok;
    for status in statuses {
        seen_any = true;
        match status {
            HealthStatus::Critical => return HealthStatus::Critical,
            HealthStatus::Warning => worst = HealthStatus::Warning,
            HealthStatus::Unknown if worst == HealthStatus::Ok => worst = HealthStatus::Unknown,
            _ => {}
        }
    }
    if seen_any {
        worst
    } else {
        HealthStatus::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRollup {
    pub processors: HealthStatus,
    pub memory: HealthStatus,
    pub power_supplies: HealthStatus,
    pub fans: HealthStatus,
    pub storage: HealthStatus,
    pub network: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThermalReading {
    pub name: String,
    pub temp_c: i64,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FanReading {
    pub name: String,
    /// Speed as reported by the controller: RPM on legacy resources, percent on newer ones.
    pub rpm: i64,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThermalDetail {
    pub temperatures: Vec<ThermalReading>,
    pub fans: Vec<FanReading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSummary {
    pub inlet_temp_c: i64,
    pub max_temp_c: i64,
    pub fan_count: usize,
    pub fans_healthy: usize,
    pub status: HealthStatus,
}

impl ThermalSummary {
    pub fn from_detail(detail: &ThermalDetail) -> Self {
        let max_temp_c = detail
            .temperatures
            .iter()
            .map(|t| t.temp_c)
            .max()
            .unwrap_or_default()
            .max(0);
        let inlet_temp_c = detail
            .temperatures
            .iter()
            .find(|t| t.name.contains("Inlet") || t.name.contains("Ambient"))
            .map_or(0, |t| t.temp_c);
        let fan_count = detail.fans.len();
        let fans_healthy = detail
            .fans
            .iter()
            .filter(|f| f.status == HealthStatus::Ok)
            .count();
        let status = if fans_healthy < fan_count {
            HealthStatus::Warning
        } else {
            HealthStatus::Ok
        };

        Self {
            inlet_temp_c,
            max_temp_c,
            fan_count,
            fans_healthy,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PsuReading {
    pub name: String,
    pub status: HealthStatus,
    pub capacity_w: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PowerDetail {
    pub current_watts: i64,
    pub psus: Vec<PsuReading>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Redundancy {
    #[default]
    Full,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PowerSummary {
    pub current_watts: i64,
    pub psu_count: usize,
    pub psus_healthy: usize,
    pub redundancy: Redundancy,
    pub status: HealthStatus,
}

impl PowerSummary {
    pub fn from_detail(detail: &PowerDetail) -> Self {
        let psu_count = detail.psus.len();
        let psus_healthy = detail
            .psus
            .iter()
            .filter(|p| p.status == HealthStatus::Ok)
            .count();
        let (redundancy, status) = if psus_healthy < psu_count {
            (Redundancy::Lost, HealthStatus::Critical)
        } else {
            (Redundancy::Full, HealthStatus::Ok)
        };

        Self {
            current_watts: detail.current_watts,
            psu_count,
            psus_healthy,
            redundancy,
            status,
        }
    }
}
