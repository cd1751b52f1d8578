use shared::models::{HealthStatus, PowerDetail, PowerSummary, PsuReading};
use tokio::sync::OnceCell;

use crate::error::{RedfishError, Result};
use crate::probe::{non_empty, ProbeChain};
use crate::resources::{Chassis, EnvironmentMetrics, LegacyPower, PowerSubsystem, PowerSupply};
use crate::session::Session;

/// Power resources of one chassis, each fetched at most once.
pub(crate) struct PowerSources<'s, 'a> {
    session: &'s Session<'a>,
    chassis: &'s Chassis,
    subsystem: OnceCell<Option<PowerSubsystem>>,
    legacy: OnceCell<Option<LegacyPower>>,
}

fn psu_reading(psu: &PowerSupply) -> PsuReading {
    PsuReading {
        name: psu.name.clone(),
        status: HealthStatus::from_redfish(psu.status.health.as_deref()),
        capacity_w: psu.power_capacity_watts.unwrap_or_default() as i64,
    }
}

impl<'s, 'a> PowerSources<'s, 'a> {
    pub(crate) fn new(session: &'s Session<'a>, chassis: &'s Chassis) -> Self {
        Self {
            session,
            chassis,
            subsystem: OnceCell::new(),
            legacy: OnceCell::new(),
        }
    }

    async fn subsystem(&self) -> Result<Option<&PowerSubsystem>> {
        self.subsystem
            .get_or_try_init(|| self.session.follow(self.chassis.power_subsystem.as_ref()))
            .await
            .map(Option::as_ref)
    }

    async fn legacy(&self) -> Result<Option<&LegacyPower>> {
        self.legacy
            .get_or_try_init(|| self.session.follow(self.chassis.power.as_ref()))
            .await
            .map(Option::as_ref)
    }

    pub(crate) async fn supplies(&self) -> Result<Option<Vec<PsuReading>>> {
        ProbeChain::new("power supplies")
            .probe("PowerSubsystem/PowerSupplies", self.modern_supplies())
            .probe("Power", self.legacy_supplies())
            .resolve()
            .await
    }

    pub(crate) async fn consumed_watts(&self) -> Result<Option<i64>> {
        ProbeChain::new("power consumption")
            .probe("EnvironmentMetrics", self.modern_consumption())
            .probe("Power", self.legacy_consumption())
            .resolve()
            .await
    }

    async fn modern_supplies(&self) -> Result<Option<Vec<PsuReading>>> {
        let Some(subsystem) = self.subsystem().await? else {
            return Ok(None);
        };
        let supplies: Option<Vec<PowerSupply>> = self
            .session
            .follow_members(subsystem.power_supplies.as_ref())
            .await?;
        Ok(supplies.and_then(|psus| non_empty(psus.iter().map(psu_reading).collect())))
    }

    async fn legacy_supplies(&self) -> Result<Option<Vec<PsuReading>>> {
        Ok(self
            .legacy()
            .await?
            .and_then(|power| non_empty(power.power_supplies.iter().map(psu_reading).collect())))
    }

    async fn modern_consumption(&self) -> Result<Option<i64>> {
        let metrics: Option<EnvironmentMetrics> = self
            .session
            .follow(self.chassis.environment_metrics.as_ref())
            .await?;
        Ok(metrics
            .and_then(|m| m.power_watts)
            .and_then(|watts| watts.reading)
            .map(|watts| watts as i64))
    }

    async fn legacy_consumption(&self) -> Result<Option<i64>> {
        Ok(self.legacy().await?.and_then(|power| {
            power
                .power_control
                .first()
                .and_then(|control| control.power_consumed_watts)
                .map(|watts| watts as i64)
        }))
    }
}

pub(crate) async fn read_power(session: &Session<'_>) -> Result<(PowerDetail, PowerSummary)> {
    let chassis = session.main_chassis().await?;
    let sources = PowerSources::new(session, &chassis);
    let psus = sources.supplies().await?;
    let watts = sources.consumed_watts().await?;
    if psus.is_none() && watts.is_none() {
        return Err(RedfishError::NoData("power"));
    }

    let detail = PowerDetail {
        current_watts: watts.unwrap_or_default(),
        psus: psus.unwrap_or_default(),
    };
    let summary = PowerSummary::from_detail(&detail);
    Ok((detail, summary))
}
