mod client;
mod error;
mod events;
mod health;
mod inventory;
mod power;
mod probe;
mod resources;
mod session;
mod thermal;

pub use client::{ManagementClient, RedfishClient, DEFAULT_TIMEOUT};
pub use error::{RedfishError, Result};
pub use inventory::{Inventory, SystemIdentity};
pub use probe::ProbeChain;

#[cfg(test)]
mod tests;
