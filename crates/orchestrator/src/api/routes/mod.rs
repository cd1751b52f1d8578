pub(crate) mod catalog;
pub(crate) mod dashboard;
pub(crate) mod events;
pub(crate) mod metrics;
pub(crate) mod nodes;
pub(crate) mod updates;
