mod inventory;

pub use inventory::InventoryFileDiscovery;

use anyhow::Result;
use async_trait::async_trait;
use shared::models::Host;

/// Source of the hosts to poll. Called once at the start of every cycle.
#[async_trait]
pub trait HostDiscovery: Send + Sync {
    async fn discover(&self) -> Result<Vec<Host>>;
}
