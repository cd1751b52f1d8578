use crate::catalog::CatalogIndex;
use crate::metrics::ScanMetrics;
use crate::store::core::StoreContext;
use log::{debug, info, warn};
use redfish::{ManagementClient, RedfishError};
use shared::models::{CatalogKey, FirmwareComponent, Host, NodeSnapshot, NodeStatus, Severity};
use std::sync::Arc;

/// What became of one host in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Scanned,
    Unreachable,
    /// Reachable, but not hardware from the configured vendor.
    Excluded,
}

/// Everything one per-host task needs, cloned into each task.
#[derive(Clone)]
pub(crate) struct HostScanner {
    pub(crate) client: Arc<dyn ManagementClient>,
    pub(crate) store_context: Arc<StoreContext>,
    pub(crate) metrics: Arc<dyn ScanMetrics>,
    pub(crate) catalog: Option<Arc<CatalogIndex>>,
    pub(crate) vendor: Arc<str>,
    pub(crate) event_fetch_limit: usize,
}

impl HostScanner {
    /// Reads one host and writes its snapshot and events.
    ///
    /// A controller that lists no computer system reports no manufacturer,
    /// so the host is excluded like other-vendor hardware instead of being
    /// stored with an empty manufacturer.
    pub(crate) async fn scan(&self, host: Host) -> ScanOutcome {
        let creds = &host.credentials;
        let inventory = match self.client.get_inventory(&host.bmc_address, creds).await {
            Ok(inventory) => inventory,
            Err(e) => {
                if e.is_auth() {
                    warn!("Credentials rejected by {} ({}): {e}", host.name, host.bmc_address);
                } else {
                    warn!("Failed to read inventory from {} ({}): {e}", host.name, host.bmc_address);
                }
                self.store_context
                    .node_store
                    .set_node(NodeSnapshot::unreachable(&host, NodeStatus::Unknown));
                self.metrics.record_scan(&host.name, false);
                return ScanOutcome::Unreachable;
            }
        };

        let Some(system) = inventory.system.filter(|sys| self.is_vendor(&sys.manufacturer)) else {
            debug!("Ignoring {}: not {} hardware", host.name, self.vendor);
            return ScanOutcome::Excluded;
        };

        let firmware = self.enrich(&system.model, inventory.firmware);
        let mut snapshot = NodeSnapshot {
            model: system.model,
            manufacturer: system.manufacturer,
            service_tag: system.service_tag,
            power_state: system.power_state,
            ..NodeSnapshot::unreachable(&host, NodeStatus::Unknown)
        }
        .with_firmware(firmware);

        match self.client.get_health_rollup(&host.bmc_address, creds).await {
            Ok((rollup, overall)) => {
                snapshot.health = overall;
                snapshot.health_rollup = Some(rollup);
            }
            Err(e) => log_partial(&host, "health", &e),
        }
        match self.client.get_thermal_data(&host.bmc_address, creds).await {
            Ok((_, summary)) => snapshot.thermal_summary = Some(summary),
            Err(e) => log_partial(&host, "thermal", &e),
        }
        match self.client.get_power_data(&host.bmc_address, creds).await {
            Ok((_, summary)) => snapshot.power_summary = Some(summary),
            Err(e) => log_partial(&host, "power", &e),
        }
        match self
            .client
            .get_events(&host.bmc_address, creds, self.event_fetch_limit)
            .await
        {
            Ok(events) => self.store_context.event_store.add_events(&host.name, events),
            Err(e) => log_partial(&host, "events", &e),
        }

        info!(
            "Scanned {}: {} components, {} updates available",
            host.name, snapshot.firmware_count, snapshot.updates_available
        );
        self.store_context.node_store.set_node(snapshot);
        self.metrics.record_scan(&host.name, true);
        ScanOutcome::Scanned
    }

    fn is_vendor(&self, manufacturer: &str) -> bool {
        manufacturer
            .to_ascii_lowercase()
            .contains(&self.vendor.to_ascii_lowercase())
    }

    /// Fills in the catalog's latest version and criticality per component.
    fn enrich(&self, model: &str, mut firmware: Vec<FirmwareComponent>) -> Vec<FirmwareComponent> {
        let Some(catalog) = &self.catalog else {
            return firmware;
        };
        for component in &mut firmware {
            if let Some(entry) = catalog.get(&CatalogKey::new(model, &component.component_type)) {
                component.available_version = entry.version.clone();
                component.severity = Severity::from_criticality(&entry.criticality);
            }
        }
        firmware
    }
}

fn log_partial(host: &Host, what: &str, e: &RedfishError) {
    warn!("No {what} data for {}: {e}", host.name);
}
