use crate::store::domains::event_store::EventStore;
use crate::store::domains::node_store::NodeStore;
use std::sync::Arc;

pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// The stores shared by the poller and the read surface.
pub struct StoreContext {
    pub node_store: Arc<NodeStore>,
    pub event_store: Arc<EventStore>,
}

impl StoreContext {
    pub fn new(event_capacity: usize) -> Self {
        Self {
            node_store: Arc::new(NodeStore::new()),
            event_store: Arc::new(EventStore::new(event_capacity)),
        }
    }
}

impl Default for StoreContext {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
