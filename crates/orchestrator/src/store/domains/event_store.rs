use parking_lot::RwLock;
use shared::models::HealthEvent;
use std::collections::VecDeque;

/// Bounded, append-only event log.
///
/// Once full, each insert evicts the oldest insertion, regardless of the
/// events' own timestamps.
pub struct EventStore {
    capacity: usize,
    events: RwLock<VecDeque<HealthEvent>>,
}

impl EventStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: RwLock::new(VecDeque::with_capacity(capacity.min(4096))),
        }
    }

    pub fn add_event(&self, event: HealthEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.write();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Appends events read from `node`, attributing each to it.
    pub fn add_events(&self, node: &str, batch: Vec<HealthEvent>) {
        for mut event in batch {
            event.node_name = node.to_string();
            self.add_event(event);
        }
    }

    /// Newest first by event timestamp, optionally for one node.
    ///
    /// `limit` applies after filtering and sorting; `0` returns everything.
    pub fn list_events(&self, limit: usize, node: Option<&str>) -> Vec<HealthEvent> {
        let mut matching: Vec<HealthEvent> = self
            .events
            .read()
            .iter()
            .filter(|event| match node {
                Some(name) => event.node_name == name,
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if limit > 0 {
            matching.truncate(limit);
        }
        matching
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}
