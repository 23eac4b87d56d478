use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use platform_dirs::AppDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub(crate) mod duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://hub.docker.com/v2";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(with = "crate::config::duration")]
    pub timeout: Duration,
    #[serde(with = "crate::config::duration")]
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PrometheusConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "0.0.0.0".to_string(),
            port: 9080,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Configuration {
    /// Developer mode: verbose logs and full error chains in error responses.
    pub debug: bool,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub prometheus: PrometheusConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            debug: true,
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            prometheus: PrometheusConfig::default(),
        }
    }
}

impl Configuration {
    pub fn figment(configs: Vec<PathBuf>) -> Figment {
        let fig = Figment::from(Serialized::defaults(Configuration::default()));

        let fig = match AppDirs::new(Some("hubview"), true) {
            Some(app_dirs) => {
                let config_path = app_dirs.config_dir.join("config.yaml");
                match config_path.exists() {
                    true => fig.admerge(Yaml::file(config_path)),
                    false => fig,
                }
            }
            None => fig,
        };

        let fig = configs
            .into_iter()
            .fold(fig, |fig, config_path| fig.admerge(Yaml::file(config_path)));

        fig.admerge(Env::prefixed("HUBVIEW_").split("__"))
    }

    pub fn config(figment: Figment) -> Result<Configuration> {
        let mut config: Configuration =
            figment.extract().context("Failed to load configuration")?;

        let url = Url::parse(&config.upstream.url)
            .with_context(|| format!("Invalid upstream url: {}", config.upstream.url))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!("upstream url must be http or https, got {}", url.scheme());
        }

        config.upstream.url = config.upstream.url.trim_end_matches('/').to_string();

        if config.prometheus.enabled
            && config.prometheus.port == config.server.port
            && config.prometheus.address == config.server.address
        {
            bail!(
                "prometheus and server cannot both listen on {}:{}",
                config.server.address,
                config.server.port
            );
        }

        Ok(config)
    }
}
