use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::info;

pub mod api;
pub mod config;
mod error;
pub mod hub;
mod metrics;
pub mod state;


pub use api::router;

use crate::{config::Configuration, state::AppState};

/// Binds the listeners described by `config` and spawns them onto a [`JoinSet`].
///
/// Binding happens before this returns, so a port clash is reported here and
/// not from inside a task.
pub async fn start(config: Configuration) -> Result<JoinSet<Result<()>>> {
    let state = Arc::new(AppState::new(config)?);
    let mut tasks = JoinSet::new();

    let listen_addr = format!(
        "{}:{}",
        state.config.server.address, state.config.server.port
    );

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Unable to bind to {listen_addr}"))?;

    info!(
        address = %listen_addr,
        upstream = %state.config.upstream.url,
        debug = state.config.debug,
        "Serving registry proxy"
    );

    let app = router(state.clone());
    tasks.spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    if state.config.prometheus.enabled {
        metrics::start_metrics(&mut tasks, state.clone()).await?;
    }

    Ok(tasks)
}
