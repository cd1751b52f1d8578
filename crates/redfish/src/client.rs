use async_trait::async_trait;
use log::debug;
use shared::models::{
    BmcCredentials, HealthEvent, HealthRollup, HealthStatus, PowerDetail, PowerSummary,
    ThermalDetail, ThermalSummary,
};
use std::time::Duration;

use crate::error::{RedfishError, Result};
use crate::inventory::{read_inventory, Inventory};
use crate::session::Session;
use crate::{events, health, power, thermal};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read access to a host's out-of-band management controller.
///
/// Every call is independent: it authenticates, reads what it needs and
/// keeps no state between calls.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    async fn get_inventory(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<Inventory>;

    async fn get_health_rollup(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(HealthRollup, HealthStatus)>;

    async fn get_thermal_data(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(ThermalDetail, ThermalSummary)>;

    async fn get_power_data(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(PowerDetail, PowerSummary)>;

    /// Up to `limit` system event log entries (`0` means no cap).
    async fn get_events(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
        limit: usize,
    ) -> Result<Vec<HealthEvent>>;
}

/// Redfish over HTTPS with basic authentication.
///
/// Controllers ship self-signed certificates, so certificate verification is off.
/// A bare `host[:port]` address is reached over `https://`; an address that
/// already carries a scheme is used as given.
#[derive(Clone)]
pub struct RedfishClient {
    http: reqwest::Client,
}

impl RedfishClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(RedfishError::Client)?;
        Ok(Self { http })
    }

    fn session<'a>(&'a self, bmc_address: &str, credentials: &'a BmcCredentials) -> Session<'a> {
        Session::new(&self.http, bmc_address, credentials)
    }
}

#[async_trait]
impl ManagementClient for RedfishClient {
    async fn get_inventory(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<Inventory> {
        debug!("Reading firmware inventory from {bmc_address}");
        read_inventory(&self.session(bmc_address, credentials)).await
    }

    async fn get_health_rollup(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(HealthRollup, HealthStatus)> {
        health::read_health_rollup(&self.session(bmc_address, credentials)).await
    }

    async fn get_thermal_data(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(ThermalDetail, ThermalSummary)> {
        thermal::read_thermal(&self.session(bmc_address, credentials)).await
    }

    async fn get_power_data(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
    ) -> Result<(PowerDetail, PowerSummary)> {
        power::read_power(&self.session(bmc_address, credentials)).await
    }

    async fn get_events(
        &self,
        bmc_address: &str,
        credentials: &BmcCredentials,
        limit: usize,
    ) -> Result<Vec<HealthEvent>> {
        events::read_events(&self.session(bmc_address, credentials), limit).await
    }
}
