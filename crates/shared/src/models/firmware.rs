use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Urgency of an available update, taken from the matched catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Critical,
    Recommended,
    Optional,
}

impl Severity {
    /// Maps a catalog criticality label. Unrecognised labels yield `None`.
    pub fn from_criticality(criticality: &str) -> Option<Self> {
        match criticality.trim().to_ascii_lowercase().as_str() {
            "critical" | "urgent" => Some(Self::Critical),
            "recommended" => Some(Self::Recommended),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareComponent {
    pub id: String,
    pub name: String,
    pub current_version: String,
    /// Empty when the catalog holds no entry for this component.
    #[serde(default)]
    pub available_version: String,
    pub updateable: bool,
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl FirmwareComponent {
    pub fn needs_update(&self) -> bool {
        !self.available_version.is_empty() && self.available_version != self.current_version
    }
}

/// Best-effort component type from a firmware display name.
///
/// Case-sensitive substring match, first rule wins.
pub fn classify_component(name: &str) -> &'static str {
    const RULES: &[(&[&str], &str)] = &[
        (&["BIOS"], "BIOS"),
        (&["iDRAC", "BMC"], "BMC"),
        (&["NIC", "Network", "Ethernet"], "NIC"),
        (&["RAID", "PERC", "Storage"], "Storage"),
        (&["PSU", "Power"], "Power"),
        (&["CPLD"], "CPLD"),
    ];

    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map_or("Other", |(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(current: &str, available: &str) -> FirmwareComponent {
        FirmwareComponent {
            id: "c1".to_string(),
            name: "BIOS".to_string(),
            current_version: current.to_string(),
            available_version: available.to_string(),
            updateable: true,
            component_type: "BIOS".to_string(),
            severity: None,
        }
    }

    #[test]
    fn needs_update_requires_a_different_catalog_version() {
        assert!(!component("1.0.0", "").needs_update());
        assert!(!component("1.0.0", "1.0.0").needs_update());
        assert!(component("1.0.0", "1.1.0").needs_update());
    }

    #[test]
    fn classification_follows_rule_priority() {
        assert_eq!(classify_component("BIOS"), "BIOS");
        assert_eq!(classify_component("Integrated Dell Remote Access Controller iDRAC"), "BMC");
        assert_eq!(classify_component("Broadcom NetXtreme Ethernet"), "NIC");
        assert_eq!(classify_component("PERC H755 Front"), "Storage");
        assert_eq!(classify_component("PSU.Slot.1"), "Power");
        assert_eq!(classify_component("System CPLD"), "CPLD");
        assert_eq!(classify_component("Lifecycle Controller"), "Other");
        // "BIOS" wins over "Power" when both appear
        assert_eq!(classify_component("Power BIOS"), "BIOS");
        // match is case-sensitive
        assert_eq!(classify_component("bios"), "Other");
    }

    #[test]
    fn severity_from_catalog_labels() {
        assert_eq!(Severity::from_criticality("Critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_criticality("Urgent"), Some(Severity::Critical));
        assert_eq!(Severity::from_criticality("recommended"), Some(Severity::Recommended));
        assert_eq!(Severity::from_criticality("Optional"), Some(Severity::Optional));
        assert_eq!(Severity::from_criticality(""), None);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(component("1.0.0", "1.1.0")).unwrap();
        assert_eq!(json["currentVersion"], "1.0.0");
        assert_eq!(json["availableVersion"], "1.1.0");
        assert!(json.get("severity").is_none());
    }
}
