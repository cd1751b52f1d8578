use futures::future::try_join_all;
use log::trace;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::BmcCredentials;

use crate::error::{RedfishError, Result};
use crate::resources::{Chassis, Collection, Link};

/// Authenticated view of one controller for the duration of a single call.
pub(crate) struct Session<'a> {
    http: &'a reqwest::Client,
    base_url: String,
    credentials: &'a BmcCredentials,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        http: &'a reqwest::Client,
        bmc_address: &str,
        credentials: &'a BmcCredentials,
    ) -> Self {
        let base_url = if bmc_address.contains("://") {
            bmc_address.trim_end_matches('/').to_string()
        } else {
            format!("https://{bmc_address}")
        };
        Self {
            http,
            base_url,
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url)
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        trace!("GET {url}");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, "application/json")
            .header("OData-Version", "4.0")
            .send()
            .await
            .map_err(|source| RedfishError::Transport {
                url: url.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RedfishError::Auth {
                    url,
                    status: response.status().as_u16(),
                })
            }
            StatusCode::NOT_FOUND => return Err(RedfishError::NotFound(url)),
            status if !status.is_success() => {
                return Err(RedfishError::Status {
                    url,
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RedfishError::Transport {
                url: url.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|e| RedfishError::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// Like [`Session::get`], but a missing resource is `None` rather than an error.
    pub(crate) async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(RedfishError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn follow<T: DeserializeOwned>(&self, link: Option<&Link>) -> Result<Option<T>> {
        match link {
            Some(link) => self.get_optional(&link.odata_id).await,
            None => Ok(None),
        }
    }

    /// Reads up to `limit` members of a collection (`0` reads all).
    ///
    /// Members given as bare `@odata.id` references are fetched; members the
    /// controller already expanded inline are decoded directly.
    pub(crate) async fn members<T: DeserializeOwned>(&self, path: &str, limit: usize) -> Result<Vec<T>> {
        let collection: Collection = self.get(path).await?;
        let take = if limit == 0 { usize::MAX } else { limit };
        try_join_all(
            collection
                .members
                .into_iter()
                .take(take)
                .map(|member| self.expand(member)),
        )
        .await
    }

    /// Collection behind an optional link; absent link or 404 is `None`.
    pub(crate) async fn follow_members<T: DeserializeOwned>(
        &self,
        link: Option<&Link>,
    ) -> Result<Option<Vec<T>>> {
        let Some(link) = link else {
            return Ok(None);
        };
        match self.members(&link.odata_id, 0).await {
            Ok(members) => Ok(Some(members)),
            Err(RedfishError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn expand<T: DeserializeOwned>(&self, member: Value) -> Result<T> {
        let reference = member
            .as_object()
            .filter(|fields| fields.len() == 1)
            .and_then(|fields| fields.get("@odata.id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        match reference {
            Some(path) => self.get(&path).await,
            None => serde_json::from_value(member).map_err(|e| RedfishError::Decode {
                url: self.base_url.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// First rack, blade or standalone chassis; otherwise whatever comes first.
    pub(crate) async fn main_chassis(&self) -> Result<Chassis> {
        let chassis: Vec<Chassis> = self.members("/redfish/v1/Chassis", 0).await?;
        let main = chassis.iter().position(Chassis::is_main).unwrap_or(0);
        chassis
            .into_iter()
            .nth(main)
            .ok_or(RedfishError::NoData("chassis"))
    }
}
