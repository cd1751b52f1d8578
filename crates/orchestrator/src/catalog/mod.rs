mod cache;
mod fetcher;
mod parser;

pub(crate) use cache::{CatalogCache, CatalogIndex};
pub(crate) use fetcher::CatalogFetcher;
pub(crate) use parser::parse_manifest;
#[cfg(test)]
pub(crate) use parser::SAMPLE_MANIFEST;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use shared::models::CatalogEntry;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

pub(crate) const DEFAULT_CATALOG_URL: &str = "https://downloads.dell.com/catalog/Catalog.xml.gz";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub source: String,
    pub entries: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub stale: bool,
}

/// Fetches, parses and publishes the vendor catalog. Never refreshes on its own.
pub struct CatalogService {
    fetcher: CatalogFetcher,
    cache: CatalogCache,
}

impl CatalogService {
    pub fn new(location: &str, ttl: Duration) -> Result<Self> {
        Ok(Self {
            fetcher: CatalogFetcher::new(location)?,
            cache: CatalogCache::new(ttl),
        })
    }

    /// Replaces the index with the current manifest.
    ///
    /// On any fetch or parse error the previous index stays published.
    pub async fn sync(&self) -> Result<usize> {
        info!("Syncing firmware catalog from {}", self.fetcher.location());
        let raw = self.fetcher.fetch().await?;
        let entries = parse_manifest(&raw)?;
        let parsed = entries.len();
        self.cache.set(entries);
        info!(
            "Catalog synced: {parsed} rows, {} model/type pairs",
            self.cache.count()
        );
        Ok(parsed)
    }

    pub fn needs_sync(&self) -> bool {
        self.cache.is_stale()
    }

    pub(crate) fn snapshot(&self) -> Arc<CatalogIndex> {
        self.cache.snapshot()
    }

    pub fn get_latest_version(&self, model: &str, component_type: &str) -> Option<String> {
        self.cache.get_latest_version(model, component_type)
    }

    pub fn get_entry(&self, model: &str, component_type: &str) -> Option<CatalogEntry> {
        self.cache.get_entry(model, component_type)
    }

    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            source: self.fetcher.location(),
            entries: self.cache.count(),
            last_updated: self.cache.last_updated(),
            stale: self.cache.is_stale(),
        }
    }
}
