mod scanner;

pub use scanner::ScanOutcome;

use crate::catalog::CatalogService;
use crate::discovery::HostDiscovery;
use crate::metrics::ScanMetrics;
use crate::store::core::StoreContext;
use crate::utils::loop_heartbeats::LoopHeartbeats;
use anyhow::{bail, Result};
use log::{debug, error, info, warn};
use redfish::ManagementClient;
use scanner::HostScanner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Manufacturer keyword a host must report to be kept, case-insensitive.
    pub vendor: String,
    /// Per-host cap on system event log entries read each cycle.
    pub event_fetch_limit: usize,
    /// Upper bound on concurrent host polls; `0` polls every host at once.
    pub max_concurrent_polls: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            vendor: "dell".to_string(),
            event_fetch_limit: 50,
            max_concurrent_polls: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was still running.
    Skipped,
    /// Discovery failed; nothing was written.
    Aborted,
    Completed {
        hosts: usize,
        scanned: usize,
        unreachable: usize,
        excluded: usize,
    },
}

pub struct Poller {
    config: PollerConfig,
    discovery: Arc<dyn HostDiscovery>,
    client: Arc<dyn ManagementClient>,
    store_context: Arc<StoreContext>,
    catalog: Option<Arc<CatalogService>>,
    metrics: Arc<dyn ScanMetrics>,
    heartbeats: Arc<LoopHeartbeats>,
    cycle_lock: Mutex<()>,
    running: AtomicBool,
}

impl Poller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: PollerConfig,
        discovery: Arc<dyn HostDiscovery>,
        client: Arc<dyn ManagementClient>,
        store_context: Arc<StoreContext>,
        catalog: Option<Arc<CatalogService>>,
        metrics: Arc<dyn ScanMetrics>,
        heartbeats: Arc<LoopHeartbeats>,
    ) -> Self {
        Self {
            config,
            discovery,
            client,
            store_context,
            catalog,
            metrics,
            heartbeats,
            cycle_lock: Mutex::new(()),
            running: AtomicBool::new(false),
        }
    }

    /// Polls immediately, then once per interval until cancelled.
    ///
    /// Cancellation stops future cycles; a cycle already running completes.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        if self.config.interval.is_zero() {
            bail!("poll interval must be greater than zero");
        }
        if self.running.swap(true, Ordering::SeqCst) {
            bail!("poller is already running");
        }
        info!("Starting poller with interval {:?}", self.config.interval);

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancellation_token.cancelled() => break,
            }
            self.poll_cycle().await;
        }

        info!("Poller stopped");
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Runs one cycle unless one is already in progress.
    pub async fn poll_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.cycle_lock.try_lock() else {
            warn!("Previous poll cycle still running, skipping");
            return CycleOutcome::Skipped;
        };
        let started = Instant::now();

        self.sync_catalog().await;

        let hosts = match self.discovery.discover().await {
            Ok(hosts) => hosts,
            Err(e) => {
                error!("Host discovery failed, skipping cycle: {e:#}");
                return CycleOutcome::Aborted;
            }
        };
        let total = hosts.len();
        info!("Polling {total} hosts");

        let scanner = HostScanner {
            client: self.client.clone(),
            store_context: self.store_context.clone(),
            metrics: self.metrics.clone(),
            catalog: self.catalog.as_ref().map(|catalog| catalog.snapshot()),
            vendor: Arc::from(self.config.vendor.as_str()),
            event_fetch_limit: self.config.event_fetch_limit,
        };
        let limiter = (self.config.max_concurrent_polls > 0)
            .then(|| Arc::new(Semaphore::new(self.config.max_concurrent_polls)));

        let mut tasks = JoinSet::new();
        for host in hosts {
            let scanner = scanner.clone();
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                scanner.scan(host).await
            });
        }

        let (mut scanned, mut unreachable, mut excluded) = (0, 0, 0);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(ScanOutcome::Scanned) => scanned += 1,
                Ok(ScanOutcome::Unreachable) => unreachable += 1,
                Ok(ScanOutcome::Excluded) => excluded += 1,
                Err(e) => error!("Host poll task failed: {e}"),
            }
        }

        let elapsed = started.elapsed();
        self.metrics.record_cycle(elapsed, total);
        self.heartbeats.update_poller();
        info!(
            "Poll cycle finished in {elapsed:?}: {scanned} scanned, {unreachable} unreachable, {excluded} excluded"
        );

        CycleOutcome::Completed {
            hosts: total,
            scanned,
            unreachable,
            excluded,
        }
    }

    async fn sync_catalog(&self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        if !catalog.needs_sync() {
            debug!("Catalog is fresh, not syncing");
            return;
        }
        if let Err(e) = catalog.sync().await {
            warn!("Catalog sync failed, keeping previous index: {e:#}");
        }
    }
}
