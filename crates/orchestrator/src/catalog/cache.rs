use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::models::{CatalogEntry, CatalogKey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub(crate) type CatalogIndex = HashMap<CatalogKey, CatalogEntry>;

#[derive(Default)]
struct Published {
    index: Arc<CatalogIndex>,
    synced_at: Option<Instant>,
    synced_wall: Option<DateTime<Utc>>,
}

/// In-memory index of catalog entries keyed by `(system model, component type)`.
///
/// Writers build a complete index and swap it in under one write lock, so a
/// reader holding a snapshot never sees a partially replaced index.
pub(crate) struct CatalogCache {
    ttl: Duration,
    published: RwLock<Published>,
}

impl CatalogCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            published: RwLock::new(Published::default()),
        }
    }

    /// Replaces the whole index. For duplicate keys the greatest version
    /// string wins (plain string ordering, so "2.9" ranks above "2.10").
    pub(crate) fn set(&self, entries: Vec<CatalogEntry>) {
        let mut index = CatalogIndex::with_capacity(entries.len());
        for entry in entries {
            let key = entry.key();
            match index.get(&key) {
                Some(existing) if existing.version >= entry.version => {}
                _ => {
                    index.insert(key, entry);
                }
            }
        }

        let mut published = self.published.write();
        published.index = Arc::new(index);
        published.synced_at = Some(Instant::now());
        published.synced_wall = Some(Utc::now());
    }

    /// Current index. Cheap to clone and stable while held.
    pub(crate) fn snapshot(&self) -> Arc<CatalogIndex> {
        self.published.read().index.clone()
    }

    pub(crate) fn get_latest_version(&self, model: &str, component_type: &str) -> Option<String> {
        self.get_entry(model, component_type).map(|entry| entry.version)
    }

    pub(crate) fn get_entry(&self, model: &str, component_type: &str) -> Option<CatalogEntry> {
        self.snapshot()
            .get(&CatalogKey::new(model, component_type))
            .cloned()
    }

    /// True before the first successful update and once the TTL has elapsed.
    pub(crate) fn is_stale(&self) -> bool {
        match self.published.read().synced_at {
            Some(synced_at) => synced_at.elapsed() > self.ttl,
            None => true,
        }
    }

    pub(crate) fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.published.read().synced_wall
    }

    pub(crate) fn count(&self) -> usize {
        self.published.read().index.len()
    }
}
