//! HTTP retrieval of listing pages.
//!
//! Each call performs exactly one GET of `{base_url}?p={page}`. Failures are
//! returned as [`FetchError`] and are never retried here.

use crate::config::Config;
use crate::error::FetchError;
use crate::scrapers::PageSource;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Fetches listing pages over HTTP with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    base_url: Url,
}

impl HttpPageFetcher {
    /// Build a fetcher from the run configuration.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(FetchError::BaseUrl)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, base_url })
    }

    /// URL of a given listing page.
    pub fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }
        Ok(page_url(&self.base_url, page))
    }
}

/// Append the `p` query parameter, replacing any existing one.
fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != "p")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &retained {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("p", &page.to_string());
    }
    url
}

impl PageSource for HttpPageFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, page: u32) -> Result<String, FetchError> {
        let url = self.page_url(page)?;
        let t0 = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Listing page returned non-success status");
            return Err(FetchError::Status { page, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body { page, source })?;

        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(&body, 120),
            "Fetched listing page"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> HttpPageFetcher {
        let config = Config {
            base_url: base.to_string(),
            ..Config::default()
        };
        HttpPageFetcher::from_config(&config).unwrap()
    }

    #[test]
    fn test_page_url_appends_page_parameter() {
        let f = fetcher("https://news.ycombinator.com/news");
        assert_eq!(
            f.page_url(1).unwrap().as_str(),
            "https://news.ycombinator.com/news?p=1"
        );
        assert_eq!(
            f.page_url(12).unwrap().as_str(),
            "https://news.ycombinator.com/news?p=12"
        );
    }

    #[test]
    fn test_page_url_replaces_existing_page_parameter() {
        let f = fetcher("https://example.com/news?p=9&lang=en");
        assert_eq!(
            f.page_url(2).unwrap().as_str(),
            "https://example.com/news?lang=en&p=2"
        );
    }

    #[test]
    fn test_bad_base_url_is_not_blamed_on_a_page() {
        let config = Config {
            base_url: "::not a url::".to_string(),
            ..Config::default()
        };
        let err = HttpPageFetcher::from_config(&config).unwrap_err();
        assert!(matches!(err, FetchError::BaseUrl(_)));
        assert!(err.to_string().starts_with("invalid listing base URL"));
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let f = fetcher("https://example.com/news");
        assert!(matches!(f.page_url(0), Err(FetchError::InvalidPage(0))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        let config = Config {
            base_url: "http://127.0.0.1:9/news".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let f = HttpPageFetcher::from_config(&config).unwrap();
        let err = f.fetch(1).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { page: 1, .. }));
    }
}
