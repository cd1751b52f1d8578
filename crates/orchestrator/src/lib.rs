mod api;
mod catalog;
mod cli;
mod discovery;
mod metrics;
mod poller;
mod store;
mod utils;

pub use api::server::start_server;
pub use catalog::{CatalogService, CatalogStatus};
pub use cli::Cli;
pub use discovery::{HostDiscovery, InventoryFileDiscovery};
pub use metrics::{MetricsContext, ScanMetrics};
pub use poller::{CycleOutcome, Poller, PollerConfig, ScanOutcome};
pub use store::core::StoreContext;
pub use store::domains::event_store::EventStore;
pub use store::domains::node_store::NodeStore;
pub use utils::loop_heartbeats::LoopHeartbeats;

#[derive(clap::Parser, Clone, Copy, clap::ValueEnum, Debug, PartialEq)]
pub enum ServerMode {
    ApiOnly,
    ProcessorOnly,
    Full,
}
