use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue, text::encode},
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};
use tokio::task::JoinSet;
use tracing::info;

use crate::state::AppState;

#[derive(Clone, Copy, Hash, PartialEq, Eq, EncodeLabelValue, Debug)]
pub(crate) enum Endpoint {
    Repositories,
    Tags,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct UpstreamRequestLabels {
    endpoint: Endpoint,
    outcome: String,
}

pub(crate) struct Metrics {
    upstream_requests_total: Family<UpstreamRequestLabels, Counter>,
}

impl Metrics {
    pub fn new(registry: &mut Registry) -> Self {
        let upstream_requests_total = Family::<UpstreamRequestLabels, Counter>::default();
        registry.register(
            "upstream_requests",
            "Number of requests made to the upstream registry",
            upstream_requests_total.clone(),
        );

        Self {
            upstream_requests_total,
        }
    }

    pub fn observe(&self, endpoint: Endpoint, outcome: &str) {
        self.upstream_requests_total
            .get_or_create(&UpstreamRequestLabels {
                endpoint,
                outcome: outcome.to_string(),
            })
            .inc();
    }
}

/// Axum handler that returns Prometheus metrics
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    if let Err(err) = encode(&mut buffer, &state.registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", err),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        buffer,
    )
        .into_response()
}

pub(crate) async fn start_metrics(
    tasks: &mut JoinSet<Result<()>>,
    state: Arc<AppState>,
) -> Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state.clone());

    let listen_addr = format!(
        "{}:{}",
        state.config.prometheus.address, state.config.prometheus.port
    );

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Unable to bind metrics listener to {listen_addr}"))?;

    info!(address = %listen_addr, "Serving metrics");

    tasks.spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    Ok(())
}
