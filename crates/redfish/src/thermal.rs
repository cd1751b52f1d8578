use shared::models::{FanReading, HealthStatus, ThermalDetail, ThermalReading, ThermalSummary};
use tokio::sync::OnceCell;

use crate::error::{RedfishError, Result};
use crate::probe::{non_empty, ProbeChain};
use crate::resources::{Chassis, Fan, LegacyThermal, ThermalMetrics, ThermalSubsystem};
use crate::session::Session;

/// Thermal resources of one chassis, each fetched at most once.
pub(crate) struct ThermalSources<'s, 'a> {
    session: &'s Session<'a>,
    chassis: &'s Chassis,
    subsystem: OnceCell<Option<ThermalSubsystem>>,
    legacy: OnceCell<Option<LegacyThermal>>,
}

impl<'s, 'a> ThermalSources<'s, 'a> {
    pub(crate) fn new(session: &'s Session<'a>, chassis: &'s Chassis) -> Self {
        Self {
            session,
            chassis,
            subsystem: OnceCell::new(),
            legacy: OnceCell::new(),
        }
    }

    async fn subsystem(&self) -> Result<Option<&ThermalSubsystem>> {
        self.subsystem
            .get_or_try_init(|| self.session.follow(self.chassis.thermal_subsystem.as_ref()))
            .await
            .map(Option::as_ref)
    }

    async fn legacy(&self) -> Result<Option<&LegacyThermal>> {
        self.legacy
            .get_or_try_init(|| self.session.follow(self.chassis.thermal.as_ref()))
            .await
            .map(Option::as_ref)
    }

    pub(crate) async fn temperatures(&self) -> Result<Option<Vec<ThermalReading>>> {
        ProbeChain::new("temperatures")
            .probe("ThermalSubsystem/ThermalMetrics", self.modern_temperatures())
            .probe("Thermal", self.legacy_temperatures())
            .resolve()
            .await
    }

    pub(crate) async fn fans(&self) -> Result<Option<Vec<FanReading>>> {
        ProbeChain::new("fans")
            .probe("ThermalSubsystem/Fans", self.modern_fans())
            .probe("Thermal", self.legacy_fans())
            .resolve()
            .await
    }

    async fn modern_temperatures(&self) -> Result<Option<Vec<ThermalReading>>> {
        let Some(subsystem) = self.subsystem().await? else {
            return Ok(None);
        };
        let Some(metrics) = self
            .session
            .follow::<ThermalMetrics>(subsystem.thermal_metrics.as_ref())
            .await?
        else {
            return Ok(None);
        };

        // ThermalMetrics carries no per-sensor health
        Ok(non_empty(
            metrics
                .temperature_readings_celsius
                .into_iter()
                .map(|sensor| ThermalReading {
                    name: sensor.device_name,
                    temp_c: sensor.reading.unwrap_or_default() as i64,
                    status: HealthStatus::Ok,
                })
                .collect(),
        ))
    }

    async fn legacy_temperatures(&self) -> Result<Option<Vec<ThermalReading>>> {
        Ok(self.legacy().await?.and_then(|thermal| {
            non_empty(
                thermal
                    .temperatures
                    .iter()
                    .map(|t| ThermalReading {
                        name: t.name.clone(),
                        temp_c: t.reading_celsius.unwrap_or_default() as i64,
                        status: HealthStatus::from_redfish(t.status.health.as_deref()),
                    })
                    .collect(),
            )
        }))
    }

    async fn modern_fans(&self) -> Result<Option<Vec<FanReading>>> {
        let Some(subsystem) = self.subsystem().await? else {
            return Ok(None);
        };
        let fans: Option<Vec<Fan>> = self.session.follow_members(subsystem.fans.as_ref()).await?;
        Ok(fans.and_then(|fans| {
            non_empty(
                fans.into_iter()
                    .map(|fan| FanReading {
                        name: fan.name,
                        rpm: fan
                            .speed_percent
                            .and_then(|speed| speed.reading)
                            .unwrap_or_default() as i64,
                        status: HealthStatus::from_redfish(fan.status.health.as_deref()),
                    })
                    .collect(),
            )
        }))
    }

    async fn legacy_fans(&self) -> Result<Option<Vec<FanReading>>> {
        Ok(self.legacy().await?.and_then(|thermal| {
            non_empty(
                thermal
                    .fans
                    .iter()
                    .map(|fan| FanReading {
                        name: fan.name.clone(),
                        rpm: fan.reading.unwrap_or_default() as i64,
                        status: HealthStatus::from_redfish(fan.status.health.as_deref()),
                    })
                    .collect(),
            )
        }))
    }
}

pub(crate) async fn read_thermal(session: &Session<'_>) -> Result<(ThermalDetail, ThermalSummary)> {
    let chassis = session.main_chassis().await?;
    let sources = ThermalSources::new(session, &chassis);
    let temperatures = sources.temperatures().await?;
    let fans = sources.fans().await?;
    if temperatures.is_none() && fans.is_none() {
        return Err(RedfishError::NoData("thermal"));
    }

    let detail = ThermalDetail {
        temperatures: temperatures.unwrap_or_default(),
        fans: fans.unwrap_or_default(),
    };
    let summary = ThermalSummary::from_detail(&detail);
    Ok((detail, summary))
}
