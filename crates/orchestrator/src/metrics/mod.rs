use log::warn;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Sink for poll outcomes, injected into the poller.
pub trait ScanMetrics: Send + Sync {
    fn record_scan(&self, node: &str, success: bool);
    fn record_cycle(&self, duration: Duration, hosts: usize);
}

pub struct MetricsContext {
    pub scan_total: IntCounterVec,
    pub cycle_duration: Histogram,
    pub cycle_hosts: IntGauge,
    pub registry: Registry,
}

impl MetricsContext {
    pub fn new() -> Result<Self, prometheus::Error> {
        let scan_total = IntCounterVec::new(
            Opts::new("firmware_scan_total", "Firmware scans per node and outcome"),
            &["node", "status"],
        )?;
        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "poll_cycle_duration_seconds",
                "Wall time of a full poll cycle",
            )
            .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        )?;
        let cycle_hosts = IntGauge::new("poll_cycle_hosts", "Hosts polled in the last cycle")?;

        let registry = Registry::new();
        registry.register(Box::new(scan_total.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;
        registry.register(Box::new(cycle_hosts.clone()))?;

        Ok(Self {
            scan_total,
            cycle_duration,
            cycle_hosts,
            registry,
        })
    }

    pub fn export_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

impl ScanMetrics for MetricsContext {
    fn record_scan(&self, node: &str, success: bool) {
        let status = if success { "success" } else { "failure" };
        self.scan_total.with_label_values(&[node, status]).inc();
    }

    fn record_cycle(&self, duration: Duration, hosts: usize) {
        self.cycle_duration.observe(duration.as_secs_f64());
        match i64::try_from(hosts) {
            Ok(hosts) => self.cycle_hosts.set(hosts),
            Err(e) => warn!("Host count does not fit the gauge: {e}"),
        }
    }
}
