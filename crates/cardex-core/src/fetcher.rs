use crate::config::FetchConfig;
use crate::{Error, Result};
use reqwest::Client;
use tracing::{debug, info};

/// HTTP client used for the pack directory and every pack page.
///
/// Sends the configured user agent with a fixed timeout. There are no retries:
/// a failed request is reported once and the caller decides what it aborts.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with default settings (10s timeout, desktop user agent)
    pub fn new() -> Result<Self> {
        Self::from_config(&FetchConfig::default())
    }

    /// Creates a fetcher from explicit network settings
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a document and returns its body text.
    ///
    /// Non-2xx responses are mapped to [`Error::Network`] through `error_for_status`.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let content = response.text().await?;

        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_fetcher_creation() {
        assert!(Fetcher::new().is_ok(), "Fetcher creation should succeed");
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/packs"))
            .and(header("user-agent", "cardex-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = FetchConfig {
            user_agent: "cardex-test/1.0".to_string(),
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::from_config(&config)?;
        let body = fetcher.fetch(&format!("{}/packs", mock_server.uri())).await?;
        assert_eq!(body, "<html></html>");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_maps_non_success_to_network_error() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new()?;
        let result = fetcher.fetch(&format!("{}/gone", mock_server.uri())).await;
        match result {
            Err(Error::Network(err)) => {
                assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
            },
            other => panic!("expected network error, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_times_out() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::from_config(&config)?;
        let err = fetcher
            .fetch(&format!("{}/slow", mock_server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_recoverable(), "timeouts are transient: {err}");
        Ok(())
    }
}
