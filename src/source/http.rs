//! HTTP-backed source provider
//!
//! Queries a search endpoint for playlist-document URLs and streams each
//! document body. The endpoint contract is deliberately small: a GET request
//! with `q` (the prefixed query) and `t` (the time window code) parameters,
//! answered with a plain-text list of absolute playlist URLs, one per line.
//! Blank lines and `#` comments are ignored; unparsable lines are skipped
//! with a warning rather than failing the whole search.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ProviderConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::fetch_with_retry;
use crate::source::{PlaylistReader, PlaylistStream, SourceProvider};
use crate::types::TimeWindow;

/// Source provider backed by an HTTP playlist search service
///
/// Requests carry the configured User-Agent and timeout; transient network
/// failures (timeouts, connection errors) are retried per the provider's
/// [`RetryConfig`]. HTTP error statuses are not retried.
#[derive(Debug)]
pub struct HttpSourceProvider {
    /// HTTP client shared by search and document requests
    client: reqwest::Client,

    /// Search endpoint
    base_url: Url,

    /// Prefix prepended to every query before searching
    query_prefix: String,

    /// Retry behavior for transient request failures
    retry: RetryConfig,
}

impl HttpSourceProvider {
    /// Create a new HTTP source provider from its configuration
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the base URL is missing or unparsable,
    /// and [`Error::Other`] if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Config {
                message: "search base URL is not set".to_string(),
                key: Some("provider.base_url".to_string()),
            });
        }
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid search base URL {:?}: {}", config.base_url, e),
            key: Some("provider.base_url".to_string()),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            query_prefix: config.query_prefix.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Run the search request and extract the playlist document URLs
    async fn search(&self, query: &str, window: TimeWindow) -> Result<Vec<Url>> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &format!("{}{}", self.query_prefix, query))
            .append_pair("t", window.code());

        let client = &self.client;
        let body = fetch_with_retry(&self.retry, || {
            let client = client.clone();
            let url = url.clone();
            async move {
                let response = client.get(url).send().await?.error_for_status()?;
                Ok::<_, Error>(response.text().await?)
            }
        })
        .await?;

        Ok(parse_url_list(&body))
    }
}

#[async_trait]
impl SourceProvider for HttpSourceProvider {
    async fn open(&self, query: &str, window: TimeWindow) -> std::io::Result<PlaylistStream> {
        let urls = self
            .search(query, window)
            .await
            .map_err(std::io::Error::other)?;
        debug!(query, results = urls.len(), "search complete");

        let client = self.client.clone();
        let retry = self.retry.clone();
        let stream = futures::stream::iter(urls).then(move |url| {
            let client = client.clone();
            let retry = retry.clone();
            async move {
                let response = fetch_with_retry(&retry, || {
                    let client = client.clone();
                    let url = url.clone();
                    async move { Ok::<_, Error>(client.get(url).send().await?.error_for_status()?) }
                })
                .await
                .map_err(std::io::Error::other)?;

                let body = response
                    .bytes_stream()
                    .map_err(std::io::Error::other)
                    .boxed();
                Ok(Box::new(StreamReader::new(body)) as PlaylistReader)
            }
        });

        Ok(Box::pin(stream))
    }
}

/// Parse a plain-text URL list body: one URL per line, `#` comments and
/// blank lines skipped, unparsable lines dropped with a warning
fn parse_url_list(body: &str) -> Vec<Url> {
    let mut urls = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Url::parse(line) {
            Ok(url) => urls.push(url),
            Err(e) => {
                warn!(line, error = %e, "skipping unparsable playlist URL");
            }
        }
    }
    urls
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_list_parsing_skips_comments_and_garbage() {
        let body = "\
# search results for extinf sky calcio
https://host.example/playlists/1.m3u

not a url
https://host.example/playlists/2.m3u
  # trailing comment
";
        let urls = parse_url_list(body);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].path(), "/playlists/1.m3u");
        assert_eq!(urls[1].path(), "/playlists/2.m3u");
    }

    #[test]
    fn empty_body_yields_no_urls() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n\n# nothing\n").is_empty());
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let config = ProviderConfig::default();
        let err = HttpSourceProvider::new(&config).unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("provider.base_url")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_base_url_is_a_config_error() {
        let config = ProviderConfig {
            base_url: "not a url at all".to_string(),
            ..ProviderConfig::default()
        };
        assert!(HttpSourceProvider::new(&config).is_err());
    }
}
