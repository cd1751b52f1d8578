use serde::{Deserialize, Serialize};
use std::fmt;

/// Login used against a host's management controller.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmcCredentials {
    pub username: String,
    pub password: String,
}

impl BmcCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BmcCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BmcCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A polling target as handed out by discovery. Immutable for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub namespace: String,
    /// Normalised controller address (`host` or `host:port`).
    pub bmc_address: String,
    pub credentials: BmcCredentials,
}
