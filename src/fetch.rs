//! Retrieval of the raw portal markup over HTTP.
//!
//! The page is requested through the MediaWiki `action=parse` API, which
//! wraps the rendered HTML in a JSON envelope (`parse.text["*"]`).
//!
//! - [`FetchSource`]: anything that can produce a [`RawDocument`]
//! - [`WikipediaFetcher`]: the `reqwest` implementation
//! - [`RetryFetch`]: decorator adding exponential backoff with jitter
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::error::NetworkError;
use crate::models::RawDocument;
use crate::utils::{now_millis, truncate_for_log};
use rand::{Rng, rng};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const USER_AGENT: &str = concat!("current_events_digest/", env!("CARGO_PKG_VERSION"));

/// Something that can retrieve the raw source document.
pub trait FetchSource {
    async fn fetch(&self) -> Result<RawDocument, NetworkError>;
}

/// Fetches a rendered page through the MediaWiki parse API.
#[derive(Debug, Clone)]
pub struct WikipediaFetcher {
    client: reqwest::Client,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct ParseEnvelope {
    parse: Option<ParseBody>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    text: ParseText,
}

#[derive(Debug, Deserialize)]
struct ParseText {
    #[serde(rename = "*")]
    html: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

impl WikipediaFetcher {
    /// Build a fetcher for `page` on the API at `api_url`.
    pub fn new(api_url: &str, page: &str) -> Result<Self, NetworkError> {
        let url = parse_api_url(api_url, page)?;
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, url })
    }
}

impl FetchSource for WikipediaFetcher {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch(&self) -> Result<RawDocument, NetworkError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let markup = html_from_envelope(&body)?;
        info!(bytes = markup.len(), "Fetched page markup");
        Ok(RawDocument {
            markup,
            retrieved_at: now_millis(),
        })
    }
}

/// Build the parse API query for `page`.
fn parse_api_url(api_url: &str, page: &str) -> Result<Url, NetworkError> {
    Url::parse_with_params(
        api_url,
        &[
            ("action", "parse"),
            ("page", page),
            ("prop", "text"),
            ("format", "json"),
            ("origin", "*"),
        ],
    )
    .map_err(|e| NetworkError::Body(format!("invalid API URL '{api_url}': {e}")))
}

/// Pull the rendered HTML out of a parse API response body.
fn html_from_envelope(body: &str) -> Result<String, NetworkError> {
    let envelope: ParseEnvelope = serde_json::from_str(body).map_err(|e| {
        NetworkError::Body(format!("{e}: {}", truncate_for_log(body, 200)))
    })?;
    if let Some(err) = envelope.error {
        return Err(NetworkError::Body(format!("{}: {}", err.code, err.info)));
    }
    envelope
        .parse
        .map(|p| p.text.html)
        .ok_or_else(|| NetworkError::Body("response has no parse.text".to_string()))
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchSource`].
pub struct RetryFetch<T> {
    inner: T,
    /// Total attempts, the first one included.
    max_attempts: usize,
    /// Delay before the second attempt (doubles with each attempt).
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchSource,
{
    pub fn new(inner: T, max_attempts: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn delay_for(&self, attempt: usize) -> StdDuration {
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchSource for RetryFetch<T>
where
    T: FetchSource,
{
    #[instrument(level = "info", skip_all)]
    async fn fetch(&self) -> Result<RawDocument, NetworkError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.fetch().await {
                Ok(doc) => {
                    debug!(attempt, "fetch() succeeded");
                    return Ok(doc);
                }
                // 4xx answers will not improve on retry
                Err(NetworkError::Status(code)) if (400..500).contains(&code) => {
                    error!(attempt, status = code, "fetch() rejected by server");
                    return Err(NetworkError::Status(code));
                }
                Err(e) if attempt >= self.max_attempts => {
                    error!(
                        attempt,
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        error = %e,
                        "fetch() exhausted retries"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.max_attempts,
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
    use std::cell::{Cell, RefCell};

    /// Source replaying a scripted list of outcomes.
    struct Scripted {
        outcomes: RefCell<Vec<Result<RawDocument, NetworkError>>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<Result<RawDocument, NetworkError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: RefCell::new(outcomes),
                calls: Cell::new(0),
            }
        }
    }

    impl FetchSource for Scripted {
        async fn fetch(&self) -> Result<RawDocument, NetworkError> {
            self.calls.set(self.calls.get() + 1);
            self.outcomes
                .borrow_mut()
                .pop()
                .unwrap_or(Err(NetworkError::Status(599)))
        }
    }

    fn doc() -> RawDocument {
        RawDocument {
            markup: "<div></div>".to_string(),
            retrieved_at: 1,
        }
    }

    #[test]
    fn test_parse_api_url_has_query() {
        let url = parse_api_url(crate::config::DEFAULT_API_URL, "Portal:Current_events").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("action=parse"));
        assert!(query.contains("page=Portal%3ACurrent_events"));
        assert!(query.contains("format=json"));
    }

    #[test]
    fn test_html_from_envelope() {
        let body = r#"{"parse":{"title":"Portal:Current events","text":{"*":"<div>hi</div>"}}}"#;
        assert_eq!(html_from_envelope(body).unwrap(), "<div>hi</div>");
    }

    #[test]
    fn test_html_from_envelope_api_error() {
        let body = r#"{"error":{"code":"missingtitle","info":"The page doesn't exist."}}"#;
        let err = html_from_envelope(body).unwrap_err();
        assert!(err.to_string().contains("missingtitle"));
    }

    #[test]
    fn test_html_from_envelope_not_json() {
        let err = html_from_envelope("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, NetworkError::Body(_)));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_server_error() {
        let inner = Scripted::new(vec![Err(NetworkError::Status(503)), Ok(doc())]);
        let retry = RetryFetch::new(inner, 3, StdDuration::from_millis(1));
        let got = retry.fetch().await.unwrap();
        assert_eq!(got, doc());
        assert_eq!(retry.inner.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let inner = Scripted::new(vec![
            Err(NetworkError::Status(502)),
            Err(NetworkError::Status(503)),
        ]);
        let retry = RetryFetch::new(inner, 2, StdDuration::from_millis(1));
        let err = retry.fetch().await.unwrap_err();
        assert!(matches!(err, NetworkError::Status(503)));
        assert_eq!(retry.inner.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_retry_does_not_repeat_client_errors() {
        let inner = Scripted::new(vec![Err(NetworkError::Status(404)), Ok(doc())]);
        let retry = RetryFetch::new(inner, 5, StdDuration::from_millis(1));
        let err = retry.fetch().await.unwrap_err();
        assert!(matches!(err, NetworkError::Status(404)));
        assert_eq!(retry.inner.calls.get(), 1);
    }
}
