use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A vendor update package as it applies to one system model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub component_id: String,
    pub component_type: String,
    pub system_model_id: String,
    pub version: String,
    pub release_date: String,
    pub criticality: String,
    pub download_url: String,
    pub file_name: String,
    pub size_mb: u64,
}

impl CatalogEntry {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(&self.system_model_id, &self.component_type)
    }
}

/// Index key of the catalog: `(system model, component type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogKey {
    pub model: String,
    pub component_type: String,
}

impl CatalogKey {
    pub fn new(model: &str, component_type: &str) -> Self {
        Self {
            model: model.to_string(),
            component_type: component_type.to_string(),
        }
    }
}
