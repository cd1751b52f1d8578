use log::debug;
use shared::models::{aggregate_health, HealthRollup, HealthStatus};

use crate::error::{RedfishError, Result};
use crate::power::PowerSources;
use crate::resources::{ComputerSystem, Link, StatusOnly};
use crate::session::Session;
use crate::thermal::ThermalSources;

pub(crate) async fn read_health_rollup(
    session: &Session<'_>,
) -> Result<(HealthRollup, HealthStatus)> {
    let systems: Vec<ComputerSystem> = session.members("/redfish/v1/Systems", 1).await?;
    let system = systems
        .into_iter()
        .next()
        .ok_or(RedfishError::NoData("system"))?;
    let overall = HealthStatus::from_redfish(system.status.health.as_deref());

    let mut rollup = HealthRollup {
        processors: subsystem(session, "processors", system.processors.as_ref()).await?,
        memory: subsystem(session, "memory", system.memory.as_ref()).await?,
        storage: subsystem(session, "storage", system.storage.as_ref()).await?,
        network: subsystem(session, "network", system.ethernet_interfaces.as_ref()).await?,
        ..Default::default()
    };

    let chassis = match session.main_chassis().await {
        Ok(chassis) => chassis,
        Err(e) if e.is_auth() => return Err(e),
        Err(e) => {
            debug!("health rollup: no chassis: {e}");
            return Ok((rollup, overall));
        }
    };

    let fans = ThermalSources::new(session, &chassis).fans().await;
    if let Some(fans) = tolerate("fans", fans)? {
        rollup.fans = aggregate_health(fans.iter().map(|fan| fan.status));
    }
    let psus = PowerSources::new(session, &chassis).supplies().await;
    if let Some(psus) = tolerate("power supplies", psus)? {
        rollup.power_supplies = aggregate_health(psus.iter().map(|psu| psu.status));
    }

    Ok((rollup, overall))
}

/// Worst health across the members of one system sub-collection.
async fn subsystem(
    session: &Session<'_>,
    label: &str,
    link: Option<&Link>,
) -> Result<HealthStatus> {
    let members = session.follow_members::<StatusOnly>(link).await;
    Ok(match tolerate(label, members)? {
        Some(members) => aggregate_health(
            members
                .iter()
                .map(|member| HealthStatus::from_redfish(member.status.health.as_deref())),
        ),
        None => HealthStatus::Unknown,
    })
}

/// A failing sub-resource leaves its field unknown; credential failures still propagate.
fn tolerate<T>(label: &str, result: Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_auth() => Err(e),
        Err(e) => {
            debug!("health rollup: {label} unavailable: {e}");
            Ok(None)
        }
    }
}
