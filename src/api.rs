//! Best-reply API access with optional exponential backoff.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait for "give me the document for this date"
//! - [`HttpFetcher`]: the reqwest-backed implementation hitting the Daum API
//! - [`RetryFetch`]: decorator adding retry logic to any `FetchAsync`
//!
//! # Retry Strategy
//!
//! - `max_retries` extra attempts (zero means the first error is returned)
//! - Exponential backoff from `base_delay`, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::error::{Error, Result};
use chrono::NaiveDate;
use rand::{Rng, rng};
use reqwest::Client;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Trait for fetching the raw best-reply document of one day.
pub trait FetchAsync {
    /// Return the response body for `date`, verbatim.
    async fn fetch(&self, date: NaiveDate) -> Result<String>;
}

/// Format a date the way the API and the cache file names expect it.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Build `{endpoint}/{YYYYMMDD}.json?limit={limit}&scope=0&type=mobile`.
pub fn bestreply_url(endpoint: &str, date: NaiveDate, limit: usize) -> Result<Url> {
    let base = format!("{}/", endpoint.trim_end_matches('/'));
    let mut url = Url::parse(&base)?.join(&format!("{}.json", date_key(date)))?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("scope", "0")
        .append_pair("type", "mobile");
    Ok(url)
}

/// Fetches documents over HTTP from the best-reply endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
    limit: usize,
}

impl HttpFetcher {
    pub fn new(endpoint: impl Into<String>, limit: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            limit,
        }
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%date))]
    async fn fetch(&self, date: NaiveDate) -> Result<String> {
        let url = bestreply_url(&self.endpoint, date, self.limit)?;
        let t0 = Instant::now();

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Best-reply request failed");
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;

        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched best-reply document"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchAsync`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "debug", skip_all, fields(%date))]
    async fn fetch(&self, date: NaiveDate) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(date).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Flaky {
        failures_left: Cell<usize>,
        calls: Cell<usize>,
    }

    impl FetchAsync for Flaky {
        async fn fetch(&self, _date: NaiveDate) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(Error::Status {
                    url: "http://test".to_string(),
                    status: 500,
                });
            }
            Ok("{}".to_string())
        }
    }

    fn flaky(failures: usize) -> Flaky {
        Flaky {
            failures_left: Cell::new(failures),
            calls: Cell::new(0),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 1, 5).unwrap()
    }

    #[test]
    fn test_bestreply_url() {
        let url = bestreply_url("http://m.media.daum.net/api/service/bestreply", day(), 100)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://m.media.daum.net/api/service/bestreply/20120105.json?limit=100&scope=0&type=mobile"
        );
    }

    #[test]
    fn test_bestreply_url_trailing_slash() {
        let url = bestreply_url("http://localhost:8080/bestreply/", day(), 7).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/bestreply/20120105.json?limit=7&scope=0&type=mobile"
        );
    }

    #[test]
    fn test_bestreply_url_invalid_endpoint() {
        assert!(matches!(
            bestreply_url("not a url", day(), 1),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_date_key() {
        assert_eq!(date_key(day()), "20120105");
    }

    #[tokio::test]
    async fn test_no_retries_returns_first_error() {
        let retry = RetryFetch::new(flaky(1), 0, StdDuration::from_millis(1));
        assert!(retry.fetch(day()).await.is_err());
        assert_eq!(retry.inner.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let retry = RetryFetch::new(flaky(2), 3, StdDuration::from_millis(1));
        assert_eq!(retry.fetch(day()).await.unwrap(), "{}");
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let retry = RetryFetch::new(flaky(5), 2, StdDuration::from_millis(1));
        assert!(retry.fetch(day()).await.is_err());
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[test]
    fn test_backoff_capped() {
        let retry = RetryFetch::new(flaky(0), 10, StdDuration::from_secs(1));
        let delay = retry.backoff(10);
        assert!(delay >= StdDuration::from_secs(30));
        assert!(delay <= StdDuration::from_millis(30_250));
    }
}
