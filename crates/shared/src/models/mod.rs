pub mod catalog;
pub mod dashboard;
pub mod event;
pub mod firmware;
pub mod health;
pub mod host;
pub mod node;

pub use catalog::{CatalogEntry, CatalogKey};
pub use dashboard::{summarize_updates, DashboardStats, UpdateSummary};
pub use event::HealthEvent;
pub use firmware::{FirmwareComponent, Severity};
pub use health::{
    aggregate_health, FanReading, HealthRollup, HealthStatus, PowerDetail, PowerSummary,
    PsuReading, Redundancy, ThermalDetail, ThermalReading, ThermalSummary,
};
pub use host::{BmcCredentials, Host};
pub use node::{NodeSnapshot, NodeStatus, PowerState};
