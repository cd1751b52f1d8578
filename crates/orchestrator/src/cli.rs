use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, info};
use redfish::RedfishClient;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::{
    start_server, CatalogService, InventoryFileDiscovery, LoopHeartbeats, MetricsContext, Poller,
    PollerConfig, ServerMode, StoreContext,
};

#[derive(Parser)]
#[command(about = "Polls bare-metal management controllers for firmware and health state")]
pub struct Cli {
    /// Server mode: full, api or processor
    #[arg(long, default_value = "full")]
    pub mode: String,

    /// Address the read API binds to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub listen_host: String,

    /// Port
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// TOML inventory listing the hosts to poll
    #[arg(short = 'i', long, env = "INVENTORY_FILE")]
    pub inventory: Option<PathBuf>,

    /// Only poll hosts in this namespace
    #[arg(long, env = "WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Seconds between poll cycles
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "1800")]
    pub poll_interval_secs: u64,

    /// Firmware catalog location (http(s) URL or local path)
    #[arg(long, env = "CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Seconds a synced catalog stays fresh
    #[arg(long, env = "CATALOG_TTL_SECS", default_value = "86400")]
    pub catalog_ttl_secs: u64,

    /// Skip catalog enrichment entirely
    #[arg(long)]
    pub disable_catalog: bool,

    /// Health events kept in memory across all hosts
    #[arg(long, env = "EVENT_CAPACITY", default_value = "1000")]
    pub event_capacity: usize,

    /// System event log entries read per host and cycle
    #[arg(long, default_value = "50")]
    pub event_fetch_limit: usize,

    /// Cap on concurrent host polls, 0 for no cap
    #[arg(long, default_value = "0")]
    pub max_concurrent_polls: usize,

    /// Manufacturer keyword hosts must report to be tracked
    #[arg(long, default_value = "dell")]
    pub vendor: String,

    /// Per-request timeout against management controllers
    #[arg(long, default_value = "30")]
    pub redfish_timeout_secs: u64,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub async fn run(self, cancellation_token: CancellationToken) -> anyhow::Result<()> {
        let server_mode = match self.mode.as_str() {
            "api" => ServerMode::ApiOnly,
            "processor" => ServerMode::ProcessorOnly,
            "full" => ServerMode::Full,
            _ => bail!("invalid server mode: {}", self.mode),
        };
        debug!("Server mode: {server_mode:?}");

        if self.poll_interval_secs == 0 {
            bail!("poll interval must be at least one second");
        }
        let poll_interval = Duration::from_secs(self.poll_interval_secs);

        let metrics_context =
            Arc::new(MetricsContext::new().context("failed to register metrics")?);
        let heartbeats = Arc::new(LoopHeartbeats::new(&server_mode, poll_interval));
        let store_context = Arc::new(StoreContext::new(self.event_capacity));

        let catalog = if self.disable_catalog {
            info!("Catalog enrichment disabled");
            None
        } else {
            Some(Arc::new(CatalogService::new(
                &self.catalog_url,
                Duration::from_secs(self.catalog_ttl_secs),
            )?))
        };

        let mut tasks: JoinSet<Result<()>> = JoinSet::new();

        // Only poll in ProcessorOnly or Full mode
        if matches!(server_mode, ServerMode::ProcessorOnly | ServerMode::Full) {
            let Some(inventory) = self.inventory.clone() else {
                bail!("--inventory is required in {} mode", self.mode);
            };
            let discovery = Arc::new(InventoryFileDiscovery::new(
                inventory,
                self.watch_namespace.clone(),
            ));
            let client = Arc::new(
                RedfishClient::new(Duration::from_secs(self.redfish_timeout_secs))
                    .context("failed to build Redfish client")?,
            );
            let poller = Poller::new(
                PollerConfig {
                    interval: poll_interval,
                    vendor: self.vendor.clone(),
                    event_fetch_limit: self.event_fetch_limit,
                    max_concurrent_polls: self.max_concurrent_polls,
                },
                discovery,
                client,
                store_context.clone(),
                catalog.clone(),
                metrics_context.clone(),
                heartbeats.clone(),
            );
            let poller_token = cancellation_token.clone();
            tasks.spawn(async move { poller.run(poller_token).await });
        }

        // Always start server regardless of mode
        tokio::select! {
            res = start_server(
                &self.listen_host,
                self.port,
                store_context.clone(),
                heartbeats.clone(),
                catalog,
                metrics_context,
                server_mode,
            ) => {
                if let Err(e) = res {
                    error!("Server error: {e}");
                }
            }
            Some(res) = tasks.join_next() => {
                if let Err(e) = res? {
                    error!("Task error: {e}");
                }
            }
            _ = cancellation_token.cancelled() => {
                info!("Shutdown signal received");
            }
        }

        tasks.shutdown().await;
        Ok(())
    }
}
