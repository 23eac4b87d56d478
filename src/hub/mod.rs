//! Client for the Docker Hub v2 API.
//!
//! Every call is a single GET of the first results page. Nothing is retried
//! or cached.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;

mod types;

pub use self::types::{Page, RepositorySummary, TagSummary};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{status} for url ({url})")]
    Status { url: String, status: StatusCode },

    #[error("error decoding response body from url ({url})")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HubClient {
    client: reqwest::Client,
    base: String,
}

impl HubClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn repositories_url(&self, username: &str) -> String {
        format!("{}/repositories/{username}/", self.base)
    }

    pub fn tags_url(&self, username: &str, repository: &str) -> String {
        format!("{}/repositories/{username}/{repository}/tags/", self.base)
    }

    pub async fn list_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepositorySummary>, UpstreamError> {
        self.first_page(&self.repositories_url(username)).await
    }

    pub async fn list_tags(
        &self,
        username: &str,
        repository: &str,
    ) -> Result<Vec<TagSummary>, UpstreamError> {
        self.first_page(&self.tags_url(username, repository)).await
    }

    async fn first_page<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, UpstreamError> {
        debug!(url, "Fetching from upstream");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;

        let page: Page<T> =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
                url: url.to_string(),
                source,
            })?;

        if let Some(next) = &page.next {
            debug!(
                url,
                next = %next,
                count = ?page.count,
                "Further pages are not fetched"
            );
        }

        Ok(page.results)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use serde_json::json;
    use test_log::test;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> HubClient {
        HubClient::new(&UpstreamConfig {
            url: format!("{}/v2/", server.uri()),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn urls() {
        let client = HubClient::new(&UpstreamConfig::default()).unwrap();

        assert_eq!(
            client.repositories_url("alice"),
            "https://hub.docker.com/v2/repositories/alice/"
        );
        assert_eq!(
            client.tags_url("alice", "app"),
            "https://hub.docker.com/v2/repositories/alice/app/tags/"
        );
    }

    #[test(tokio::test)]
    async fn only_first_page_is_read() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/repositories/alice/app/tags/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "next": format!("{}/v2/repositories/alice/app/tags/?page=2", server.uri()),
                "results": [
                    {"name": "latest", "full_size": 10, "last_updated": "2024-01-02T00:00:00Z"},
                    {"name": "1.0", "full_size": 9, "last_updated": "2024-01-01T00:00:00Z"},
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tags = client_for(&server).list_tags("alice", "app").await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "latest");
        assert_eq!(tags[1].name, "1.0");
    }

    #[test(tokio::test)]
    async fn status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/repositories/nobody/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_repositories("nobody")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "status");
        assert!(err.to_string().starts_with("404 Not Found for url ("));
    }

    #[test(tokio::test)]
    async fn decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/repositories/alice/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_repositories("alice")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "decode");
    }

    #[test(tokio::test)]
    async fn request_error() {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = HubClient::new(&UpstreamConfig {
            url: format!("http://127.0.0.1:{port}/v2"),
            ..Default::default()
        })
        .unwrap();

        let err = client.list_repositories("alice").await.unwrap_err();

        assert_eq!(err.kind(), "request");
    }
}
