//! HTTP fetcher implementation
//!
//! One GET per call with a fixed timeout and no retry. The caller decides what a
//! failure means: a skipped item, an abandoned category, or an aborted crawl.

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure of a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// The connection could not be established
    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    /// Any other transport failure, including reading the body
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Classifies a reqwest error the way the crawler reports it
    fn classify(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Network {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Builds the HTTP client shared by every fetch of a crawl
///
/// No custom headers are set; the timeout covers the whole request, body included.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_shelf::crawler::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).gzip(true).brotli(true).build()
}

/// Single-attempt page fetcher
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher with the given fixed timeout
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
            timeout,
        })
    }

    /// Creates a fetcher from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Self::new(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches a URL and returns its body as text
    ///
    /// # Failure Classification
    ///
    /// | Condition             | Result                     |
    /// |-----------------------|----------------------------|
    /// | Timeout               | `FetchError::Timeout`      |
    /// | Connection refused    | `FetchError::Connect`      |
    /// | Non-2xx status        | `FetchError::Status`       |
    /// | Body read / other     | `FetchError::Network`      |
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::classify(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn test_from_config_uses_timeout() {
        let config = CrawlerConfig {
            request_timeout_secs: 7,
            ..CrawlerConfig::default()
        };
        let fetcher = Fetcher::from_config(&config).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status_code: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_millis(200)).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let fetcher = Fetcher::new(Duration::from_secs(2)).unwrap();
        let url = Url::parse(&format!("{}/gone", uri)).unwrap();
        let result = fetcher.fetch(&url).await;
        assert!(result.is_err());
    }
}
