use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;
use std::future::Future;

use crate::error::{RedfishError, Result};

/// Ordered list of alternative ways to read the same data. First success wins.
///
/// A probe answers `Ok(None)` when its resource is absent or empty, which
/// passes control to the next probe. Authentication failures stop the chain.
/// Other errors are remembered and returned only if no later probe succeeds.
pub struct ProbeChain<'a, T> {
    domain: &'static str,
    probes: Vec<(&'static str, BoxFuture<'a, Result<Option<T>>>)>,
}

impl<'a, T: Send + 'a> ProbeChain<'a, T> {
    pub fn new(domain: &'static str) -> Self {
        Self {
            domain,
            probes: Vec::new(),
        }
    }

    /// Appends a probe. The future is not polled until earlier probes gave up.
    pub fn probe<F>(mut self, name: &'static str, probe: F) -> Self
    where
        F: Future<Output = Result<Option<T>>> + Send + 'a,
    {
        self.probes.push((name, probe.boxed()));
        self
    }

    pub async fn resolve(self) -> Result<Option<T>> {
        let mut last_error: Option<RedfishError> = None;
        for (name, probe) in self.probes {
            match probe.await {
                Ok(Some(value)) => {
                    debug!("{}: using {name}", self.domain);
                    return Ok(Some(value));
                }
                Ok(None) => debug!("{}: {name} has no data", self.domain),
                Err(e) if e.is_auth() => return Err(e),
                Err(e) => {
                    debug!("{}: {name} failed: {e}", self.domain);
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

/// Treats an empty list the same as a missing resource.
pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
