use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use utoipa::ToSchema;

use super::firmware::Severity;
use super::health::HealthStatus;
use super::node::{NodeSnapshot, PowerState};

/// Fleet-wide view of one pending update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub component_type: String,
    pub available_version: String,
    pub affected_nodes: Vec<String>,
    pub node_count: usize,
}

/// Groups pending updates by `(component type, available version)`.
pub fn summarize_updates<'a, I>(nodes: I) -> Vec<UpdateSummary>
where
    I: IntoIterator<Item = &'a NodeSnapshot>,
{
    let mut groups: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for node in nodes {
        for fw in node.firmware.iter().filter(|fw| fw.needs_update()) {
            groups
                .entry((fw.component_type.clone(), fw.available_version.clone()))
                .or_default()
                .insert(node.name.clone());
        }
    }

    groups
        .into_iter()
        .map(|((component_type, available_version), nodes)| UpdateSummary {
            component_type,
            available_version,
            node_count: nodes.len(),
            affected_nodes: nodes.into_iter().collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct HealthCounts {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct PowerCounts {
    pub on: usize,
    pub off: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCounts {
    pub total: usize,
    pub critical: usize,
    pub recommended: usize,
    pub optional: usize,
    pub nodes_with_updates: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_nodes: usize,
    pub health_summary: HealthCounts,
    pub power_summary: PowerCounts,
    pub updates_summary: UpdateCounts,
    pub last_refresh: Option<DateTime<Utc>>,
    pub next_refresh: Option<DateTime<Utc>>,
}

impl DashboardStats {
    pub fn from_nodes(nodes: &[NodeSnapshot]) -> Self {
        let mut stats = Self {
            total_nodes: nodes.len(),
            ..Default::default()
        };
        let mut nodes_with_updates = HashSet::new();

        for node in nodes {
            match node.health {
                HealthStatus::Ok => stats.health_summary.healthy += 1,
                HealthStatus::Warning => stats.health_summary.warning += 1,
                HealthStatus::Critical => stats.health_summary.critical += 1,
                HealthStatus::Unknown => {}
            }
            match node.power_state {
                PowerState::On => stats.power_summary.on += 1,
                PowerState::Off => stats.power_summary.off += 1,
                PowerState::Unknown => {}
            }
            for fw in node.firmware.iter().filter(|fw| fw.needs_update()) {
                stats.updates_summary.total += 1;
                nodes_with_updates.insert(node.name.as_str());
                match fw.severity {
                    Some(Severity::Critical) => stats.updates_summary.critical += 1,
                    Some(Severity::Recommended) => stats.updates_summary.recommended += 1,
                    Some(Severity::Optional) => stats.updates_summary.optional += 1,
                    None => {}
                }
            }
        }
        stats.updates_summary.nodes_with_updates = nodes_with_updates.len();
        stats
    }
}
