use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedfishError {
    #[error("authentication rejected by {url} (HTTP {status})")]
    Auth { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unexpected HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode {url}: {message}")]
    Decode { url: String, message: String },

    #[error("controller exposes no {0} data")]
    NoData(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RedfishError {
    /// Credential failures end a host's poll; they are never retried on another path.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

pub type Result<T> = std::result::Result<T, RedfishError>;
