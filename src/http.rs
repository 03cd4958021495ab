//! Page fetching behind a small trait seam.
//!
//! - [`Fetch`]: the "GET a page as text" capability the extractors depend on
//! - [`HttpFetcher`]: the `reqwest` implementation with a fixed user agent
//!   and per-request timeout
//!
//! There is no retry. A failed fetch is reported to the caller, which logs
//! it and moves on to the next keyword or site.

use crate::error::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; opportunity_digest/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Fetch a page body as text.
pub trait Fetch {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
