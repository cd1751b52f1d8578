use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use utoipa::ToSchema;

use crate::ServerMode;

const MIN_STALE_SECS: i64 = 120;

#[derive(Serialize, ToSchema)]
pub(crate) struct HealthStatus {
    pub(crate) healthy: bool,
    pub(crate) poller_last_run_seconds_ago: i64,
    pub(crate) poller_stale_after_seconds: i64,
}

/// Tracks when the poll loop last finished a cycle.
pub struct LoopHeartbeats {
    last_poll_cycle: AtomicI64,
    stale_after_secs: i64,
    poll_interval: Duration,
    server_mode: ServerMode,
}

impl LoopHeartbeats {
    pub fn new(server_mode: &ServerMode, poll_interval: Duration) -> Self {
        let twice_interval =
            i64::try_from(poll_interval.as_secs().saturating_mul(2)).unwrap_or(i64::MAX);
        Self {
            last_poll_cycle: AtomicI64::new(-1),
            stale_after_secs: twice_interval.max(MIN_STALE_SECS),
            poll_interval,
            server_mode: *server_mode,
        }
    }

    pub fn update_poller(&self) {
        self.last_poll_cycle
            .store(Utc::now().timestamp(), Ordering::SeqCst);
    }

    /// When the last poll cycle finished, if any has.
    pub fn last_cycle(&self) -> Option<DateTime<Utc>> {
        match self.last_poll_cycle.load(Ordering::SeqCst) {
            last if last > 0 => DateTime::from_timestamp(last, 0),
            _ => None,
        }
    }

    pub fn next_cycle(&self) -> Option<DateTime<Utc>> {
        let interval = chrono::Duration::from_std(self.poll_interval).ok()?;
        self.last_cycle()
            .and_then(|last| last.checked_add_signed(interval))
    }

    pub(crate) fn health_status(&self) -> HealthStatus {
        let now = Utc::now().timestamp();
        let last = self.last_poll_cycle.load(Ordering::SeqCst);
        let seconds_ago = if last > 0 { now - last } else { -1 };

        let healthy = match self.server_mode {
            ServerMode::ApiOnly => true,
            _ => seconds_ago != -1 && seconds_ago < self.stale_after_secs,
        };

        HealthStatus {
            healthy,
            poller_last_run_seconds_ago: seconds_ago,
            poller_stale_after_seconds: self.stale_after_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_until_first_cycle() {
        let heartbeats = LoopHeartbeats::new(&ServerMode::Full, Duration::from_secs(1800));
        let status = heartbeats.health_status();
        assert!(!status.healthy);
        assert_eq!(status.poller_last_run_seconds_ago, -1);
        assert_eq!(status.poller_stale_after_seconds, 3600);

        heartbeats.update_poller();
        assert!(heartbeats.health_status().healthy);

        let last = heartbeats.last_cycle().unwrap();
        assert_eq!(
            heartbeats.next_cycle(),
            Some(last + chrono::Duration::seconds(1800))
        );
    }

    #[test]
    fn short_intervals_use_minimum_threshold() {
        let heartbeats = LoopHeartbeats::new(&ServerMode::ProcessorOnly, Duration::from_secs(5));
        assert_eq!(heartbeats.health_status().poller_stale_after_seconds, 120);
    }

    #[test]
    fn stale_cycle_is_unhealthy() {
        let heartbeats = LoopHeartbeats::new(&ServerMode::Full, Duration::from_secs(30));
        heartbeats
            .last_poll_cycle
            .store(Utc::now().timestamp() - 600, Ordering::SeqCst);
        assert!(!heartbeats.health_status().healthy);
    }

    #[test]
    fn api_only_is_always_healthy() {
        let heartbeats = LoopHeartbeats::new(&ServerMode::ApiOnly, Duration::from_secs(30));
        assert!(heartbeats.health_status().healthy);
    }
}
