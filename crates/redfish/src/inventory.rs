use serde::Serialize;
use shared::models::firmware::classify_component;
use shared::models::{FirmwareComponent, PowerState};

use crate::error::Result;
use crate::resources::{ComputerSystem, SoftwareInventory, UpdateService};
use crate::session::Session;

/// Hardware identity of the first computer system behind a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemIdentity {
    pub model: String,
    pub manufacturer: String,
    pub service_tag: String,
    pub power_state: PowerState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inventory {
    pub firmware: Vec<FirmwareComponent>,
    /// `None` when the controller lists no computer systems.
    pub system: Option<SystemIdentity>,
}

pub(crate) async fn read_inventory(session: &Session<'_>) -> Result<Inventory> {
    let systems: Vec<ComputerSystem> = session.members("/redfish/v1/Systems", 1).await?;
    let system = systems.into_iter().next().map(|sys| SystemIdentity {
        service_tag: if sys.sku.is_empty() {
            sys.asset_tag
        } else {
            sys.sku
        },
        model: sys.model,
        manufacturer: sys.manufacturer,
        power_state: PowerState::from_redfish(sys.power_state.as_deref()),
    });

    let update_service: UpdateService = session.get("/redfish/v1/UpdateService").await?;
    let inventory_path = update_service
        .firmware_inventory
        .map_or_else(
            || "/redfish/v1/UpdateService/FirmwareInventory".to_string(),
            |link| link.odata_id,
        );
    let entries: Vec<SoftwareInventory> = session.members(&inventory_path, 0).await?;

    let firmware = entries
        .into_iter()
        .map(|fw| FirmwareComponent {
            component_type: classify_component(&fw.name).to_string(),
            id: fw.id,
            name: fw.name,
            current_version: fw.version,
            available_version: String::new(),
            updateable: fw.updateable,
            severity: None,
        })
        .collect();

    Ok(Inventory { firmware, system })
}
