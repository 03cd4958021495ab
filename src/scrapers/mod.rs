//! Listing extractors for job and PhD boards.
//!
//! Every source shares one pipeline shape:
//!
//! 1. **Targets**: build one search URL per keyword (or take each configured
//!    site verbatim for the generic harvester)
//! 2. **Fetch**: download the page; failures are logged and skipped
//! 3. **Candidates**: walk `a[href]` anchors and keep those whose resolved
//!    URL looks like a listing for this source
//! 4. **Relevance**: match keywords against anchor text plus the text of the
//!    nearest enclosing block; no match, no listing
//! 5. **Inference**: location and organization from fixed-priority patterns,
//!    with per-source defaults
//!
//! Sources only describe what differs through the [`Extractor`] trait; the
//! steps above live in [`run_source`].
//!
//! # Supported Sources
//!
//! | Source | Module | Listing path |
//! |--------|--------|--------------|
//! | FindAPhD | [`findaphd`] | `/phds/project/` |
//! | jobs.ac.uk | [`jobs_ac_uk`] | `/job/` |
//! | Psychedelic Alpha | [`psychedelic_alpha`] | `/jobs/<slug>` |
//! | Nature Careers | [`nature_careers`] | `/naturecareers/job/` |
//! | EURAXESS | [`euraxess`] | `/jobs/<id>` |
//! | Any site | [`generic`] | job-indicative fragments in the href |

pub mod euraxess;
pub mod findaphd;
pub mod generic;
pub mod jobs_ac_uk;
pub mod nature_careers;
pub mod psychedelic_alpha;

use crate::config::Config;
use crate::error::FetchError;
use crate::http::Fetch;
use crate::location::{DEFAULT_UK, find_organization, find_place, is_uk};
use crate::matcher::match_keywords;
use crate::models::{Listing, SourceId};
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Elements whose text is taken as the context of an anchor inside them.
const BLOCK_TAGS: &[&str] = &["article", "li", "div", "tr"];

/// What varies between sources.
pub trait Extractor {
    fn id(&self) -> SourceId;

    /// Pages to fetch, in order.
    fn targets(&self, keywords: &[String]) -> Vec<String>;

    /// Whether a resolved anchor target points at a listing page.
    fn is_listing(&self, url: &Url) -> bool;

    /// Candidate filter over the raw `href` and its resolved `url`.
    fn is_candidate(&self, _href: &str, url: &Url) -> bool {
        self.is_listing(url)
    }

    /// Anchors with shorter visible text are navigation noise.
    fn min_title_len(&self) -> usize {
        6
    }

    /// Organization used when none can be inferred from the context.
    fn default_organization(&self, page: &Url) -> String;

    /// Location used when no known place appears in the context.
    fn default_location(&self, _page: &Url, _context: &str) -> &'static str {
        DEFAULT_UK
    }
}

/// Per-run knobs shared by every source.
#[derive(Debug, Clone)]
pub struct ExtractOptions<'a> {
    pub keywords: &'a [String],
    /// Listings kept per fetched page.
    pub per_page_cap: usize,
    pub restrict_to_uk: bool,
    pub politeness_delay: Duration,
}

impl<'a> ExtractOptions<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            keywords: &config.keywords,
            per_page_cap: config.per_source_cap,
            restrict_to_uk: config.restrict_to_uk,
            politeness_delay: config.politeness_delay(),
        }
    }
}

/// Build the enabled extractors in configured order.
pub fn enabled_extractors(config: &Config) -> Vec<Box<dyn Extractor>> {
    config
        .sources
        .iter()
        .map(|id| -> Box<dyn Extractor> {
            match id {
                SourceId::FindAPhd => Box::new(findaphd::FindAPhd::default()),
                SourceId::JobsAcUk => Box::new(jobs_ac_uk::JobsAcUk::default()),
                SourceId::PsychedelicAlpha => {
                    Box::new(psychedelic_alpha::PsychedelicAlpha::default())
                }
                SourceId::NatureCareers => Box::new(nature_careers::NatureCareers::default()),
                SourceId::Euraxess => Box::new(euraxess::Euraxess::default()),
                SourceId::Generic => Box::new(generic::GenericHarvester::new(
                    config.generic_sites.clone(),
                )),
            }
        })
        .collect()
}

/// Run one source end to end.
///
/// Fetch failures skip the affected target only. Requests to the same source
/// are spaced by the politeness delay.
///
/// # Arguments
///
/// * `source` - The extractor describing what to fetch and which anchors qualify
/// * `fetcher` - Network capability used for every request
/// * `opts` - Keywords, per-page cap, UK restriction and politeness delay
///
/// # Returns
///
/// Listings from every target that could be fetched, in target order. Never
/// fails; an unreachable source yields an empty vector.
#[instrument(level = "info", skip_all, fields(source = %source.id()))]
pub async fn run_source<F: Fetch>(
    source: &dyn Extractor,
    fetcher: &F,
    opts: &ExtractOptions<'_>,
) -> Vec<Listing> {
    let mut listings = Vec::new();

    for (i, target) in source.targets(opts.keywords).iter().enumerate() {
        if i > 0 && !opts.politeness_delay.is_zero() {
            sleep(opts.politeness_delay).await;
        }

        let page = match Url::parse(target) {
            Ok(page) => page,
            Err(e) => {
                let err = FetchError::InvalidUrl(target.clone());
                warn!(error = %err, reason = %e, "skip");
                continue;
            }
        };

        let html = match fetcher.get_text(page.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %page, error = %e, "Fetch failed; skip");
                continue;
            }
        };

        let found = extract_page(source, &page, &html, opts);
        debug!(url = %page, count = found.len(), "Extracted listings");
        listings.extend(found);
    }

    info!(count = listings.len(), "Source finished");
    listings
}

/// Pull listings out of one fetched page.
///
/// Anchors are taken in document order. An anchor becomes a listing when its
/// target qualifies for `source`, its text is long enough, and the keywords
/// match its text plus the enclosing block's text. With
/// `opts.restrict_to_uk`, listings whose inferred location is outside the UK
/// are dropped.
///
/// # Arguments
///
/// * `source` - The extractor whose filters and defaults apply
/// * `page` - URL the markup was fetched from, used to resolve relative links
/// * `html` - Raw page markup
/// * `opts` - Keywords, per-page cap and UK restriction
///
/// # Returns
///
/// At most `opts.per_page_cap` listings, unique by link.
pub fn extract_page(
    source: &dyn Extractor,
    page: &Url,
    html: &str,
    opts: &ExtractOptions<'_>,
) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut listings = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        if listings.len() >= opts.per_page_cap {
            break;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve(page, href) else {
            continue;
        };
        if !source.is_candidate(href, &link) {
            continue;
        }

        let title = collapse_whitespace(&anchor.text().collect::<Vec<_>>().join(" "));
        if title.chars().count() < source.min_title_len() {
            continue;
        }

        let context = block_context(&anchor);
        let searchable = format!("{title} {}", context.replace('\n', " "));
        let matched = match_keywords(&searchable, opts.keywords);
        if matched.is_empty() {
            continue;
        }

        let location = find_place(&context)
            .unwrap_or_else(|| source.default_location(page, &context))
            .to_string();
        if opts.restrict_to_uk && !is_uk(&location) {
            debug!(%link, %location, "Outside the UK; dropped");
            continue;
        }

        let organization =
            find_organization(&context).unwrap_or_else(|| source.default_organization(page));

        if !seen.insert(link.to_string()) {
            continue;
        }
        if let Some(listing) = Listing::new(
            source.id(),
            title,
            organization,
            location,
            link.to_string(),
            matched,
        ) {
            listings.push(listing);
        }
    }

    listings
}

/// Resolve `href` against the page, keeping only http(s) targets without
/// a fragment.
fn resolve(page: &Url, href: &str) -> Option<Url> {
    let mut url = page.join(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Visible text of the nearest block-level ancestor, one text node per line.
fn block_context(anchor: &ElementRef<'_>) -> String {
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| BLOCK_TAGS.contains(&el.value().name()))
        .map(|el| {
            el.text()
                .map(collapse_whitespace)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// `base` joined with `path`, plus query parameters.
pub(crate) fn search_url(base: &Url, path: &str, params: &[(&str, &str)]) -> Option<String> {
    let mut url = base.join(path).ok()?;
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in params {
            query.append_pair(k, v);
        }
    }
    Some(url.to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages by exact URL and records every request.
    #[derive(Debug, Default)]
    pub struct StubFetcher {
        pages: HashMap<String, String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl Fetch for StubFetcher {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    pub fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    pub fn opts(keywords: &[String]) -> ExtractOptions<'_> {
        ExtractOptions {
            keywords,
            per_page_cap: 8,
            restrict_to_uk: true,
            politeness_delay: Duration::ZERO,
        }
    }
}
