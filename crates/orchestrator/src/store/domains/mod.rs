pub(crate) mod event_store;
pub(crate) mod node_store;
