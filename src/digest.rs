//! One digest run: gather, rank, render, deliver.

use crate::aggregate::gather;
use crate::config::Config;
use crate::error::SendError;
use crate::http::Fetch;
use crate::mail::Mailer;
use crate::models::Listing;
use crate::outputs::html::{RenderedDigest, render_digest};
use crate::scrapers::Extractor;
use crate::utils::london_week_label;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use tracing::{info, instrument};

/// The result of a run before delivery.
#[derive(Debug, Clone)]
pub struct Digest {
    pub week_label: String,
    pub listings: Vec<Listing>,
    pub rendered: RenderedDigest,
}

impl Digest {
    /// Number of distinct sources among the ranked listings.
    pub fn source_count(&self) -> usize {
        self.listings.iter().map(|l| l.source()).unique().count()
    }
}

/// Gather listings from `extractors` and render them for the week of `now`.
///
/// # Arguments
///
/// * `config` - Run configuration
/// * `fetcher` - Network capability for every source
/// * `extractors` - Enabled sources, in configured order
/// * `now` - Reference instant; the label is its London-local Monday
///
/// # Returns
///
/// A [`Digest`] holding the week label, ranked listings and rendered email.
/// Fetch failures only shrink the result, so this never fails.
#[instrument(level = "info", skip_all, fields(%now))]
pub async fn build_digest<F: Fetch>(
    config: &Config,
    fetcher: &F,
    extractors: &[Box<dyn Extractor>],
    now: DateTime<Utc>,
) -> Digest {
    let week_label = london_week_label(now);
    let listings = gather(config, fetcher, extractors).await;
    let rendered = render_digest(&listings, &week_label, config);
    info!(
        %week_label,
        listings = listings.len(),
        body_bytes = rendered.body.len(),
        "Digest rendered"
    );
    Digest {
        week_label,
        listings,
        rendered,
    }
}

/// The configured recipient, or the sending account itself.
pub fn recipient<'a>(config: &'a Config, account: &'a str) -> &'a str {
    config.recipient.as_deref().unwrap_or(account)
}

/// Send the rendered digest. Errors propagate to the caller.
pub async fn deliver<M: Mailer>(mailer: &M, to: &str, digest: &Digest) -> Result<(), SendError> {
    mailer
        .send(to, &digest.rendered.subject, &digest.rendered.body)
        .await
}
