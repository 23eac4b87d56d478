use anyhow::{Context, Result};
use clap::Parser;
use hubview::config::Configuration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Opt {
    /// Extra YAML configuration files, applied in order.
    #[clap(short, long, value_parser)]
    pub config: Vec<std::path::PathBuf>,
    #[clap(short, long, value_parser)]
    pub port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the parameters passed by arguments.
    let options = Opt::parse();

    let mut config = Configuration::config(Configuration::figment(options.config))?;
    if let Some(port) = options.port {
        config.server.port = port;
    }

    // Setup the logger
    let default_filter = match config.debug {
        true => "hubview=debug,tower_http=debug,info",
        false => "info",
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut tasks = hubview::start(config).await?;

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Unable to listen for shutdown signal")?;
            info!("Shutting down");
        }
        Some(result) = tasks.join_next() => {
            if let Err(err) = result.context("Listener task panicked")? {
                error!("Listener failed: {err:?}");
                return Err(err);
            }
            info!("Listener exited");
        }
    }

    tasks.shutdown().await;

    Ok(())
}
