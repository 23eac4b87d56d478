use anyhow::Result;
use prometheus_client::registry::Registry;

use crate::{
    config::Configuration,
    error::ApiError,
    hub::{HubClient, UpstreamError},
    metrics::{Endpoint, Metrics},
};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub config: Configuration,
    pub hub: HubClient,
    pub registry: Registry,
    pub(crate) metrics: Metrics,
}

impl AppState {
    pub fn new(config: Configuration) -> Result<Self> {
        let mut registry = Registry::with_prefix("hubview");
        let metrics = Metrics::new(&mut registry);
        let hub = HubClient::new(&config.upstream)?;

        Ok(Self {
            config,
            hub,
            registry,
            metrics,
        })
    }

    /// Records the outcome of an upstream call and lifts failures into an [`ApiError`].
    pub(crate) fn observe<T>(
        &self,
        endpoint: Endpoint,
        result: Result<T, UpstreamError>,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.metrics.observe(endpoint, "ok");
                Ok(value)
            }
            Err(error) => {
                self.metrics.observe(endpoint, error.kind());
                Err(ApiError::UpstreamRequestFailed {
                    error,
                    verbose: self.config.debug,
                })
            }
        }
    }
}
