use crate::discovery::HostDiscovery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use shared::models::{BmcCredentials, Host};
use shared::utils::address::parse_bmc_address;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    hosts: Vec<InventoryEntry>,
}

#[derive(Debug, Deserialize)]
struct InventoryEntry {
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    bmc_address: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Reads hosts from a TOML inventory, re-reading the file on every call.
///
/// ```toml
/// [[hosts]]
/// name = "worker-0"
/// namespace = "rack-a"
/// bmc_address = "idrac-virtualmedia://10.0.0.5/redfish/v1/Systems/System.Embedded.1"
/// username = "root"
/// password = "calvin"
/// ```
pub struct InventoryFileDiscovery {
    path: PathBuf,
    namespace: Option<String>,
}

impl InventoryFileDiscovery {
    pub fn new(path: impl Into<PathBuf>, namespace: Option<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    fn parse(&self, raw: &str) -> Result<Vec<Host>> {
        let file: InventoryFile = toml::from_str(raw)
            .with_context(|| format!("invalid inventory file {}", self.path.display()))?;

        let mut hosts = Vec::with_capacity(file.hosts.len());
        for entry in file.hosts {
            if let Some(ns) = &self.namespace {
                if &entry.namespace != ns {
                    continue;
                }
            }
            let Some(address) = entry.bmc_address.as_deref().map(parse_bmc_address) else {
                warn!("Skipping {}: no BMC address configured", entry.name);
                continue;
            };
            if address.is_empty() {
                warn!("Skipping {}: empty BMC address", entry.name);
                continue;
            }
            hosts.push(Host {
                name: entry.name,
                namespace: entry.namespace,
                bmc_address: address,
                credentials: BmcCredentials::new(entry.username, entry.password),
            });
        }
        Ok(hosts)
    }
}

#[async_trait]
impl HostDiscovery for InventoryFileDiscovery {
    async fn discover(&self) -> Result<Vec<Host>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read inventory {}", self.path.display()))?;
        let hosts = self.parse(&raw)?;
        debug!("Discovered {} hosts from {}", hosts.len(), self.path.display());
        Ok(hosts)
    }
}
