//! Harvester for arbitrary institution and company career pages.
//!
//! Each configured site URL is fetched once (keywords are not part of the
//! request). Anchors qualify when their `href` or resolved path mentions a
//! job-like fragment, so vacancies on a `jobs.` subdomain or behind a query
//! string are found too.

use super::Extractor;
use crate::location::{DEFAULT_UK, DEFAULT_UNKNOWN};
use crate::models::SourceId;
use url::Url;

/// Fragments that suggest a vacancy page.
const JOB_HINTS: &[&str] = &[
    "/job",
    "vacanc",
    "opportunit",
    "careers",
    "/positions",
    "/recruit",
    "/jobs",
];

#[derive(Debug, Clone, Default)]
pub struct GenericHarvester {
    sites: Vec<String>,
}

impl GenericHarvester {
    pub fn new(sites: Vec<String>) -> Self {
        Self { sites }
    }
}

impl Extractor for GenericHarvester {
    fn id(&self) -> SourceId {
        SourceId::Generic
    }

    fn targets(&self, _keywords: &[String]) -> Vec<String> {
        self.sites.clone()
    }

    fn is_listing(&self, url: &Url) -> bool {
        has_job_hint(url.path())
    }

    fn is_candidate(&self, href: &str, url: &Url) -> bool {
        has_job_hint(href) || self.is_listing(url)
    }

    fn min_title_len(&self) -> usize {
        5
    }

    /// The site's host name, without a leading `www.`.
    fn default_organization(&self, page: &Url) -> String {
        page.host_str()
            .map(|host| host.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| "Unknown organization".to_string())
    }

    /// UK for academic UK domains. A "UK" mention in the context never gets
    /// here: place search already reports it as the United Kingdom.
    fn default_location(&self, page: &Url, _context: &str) -> &'static str {
        if page.host_str().is_some_and(|host| host.ends_with(".ac.uk")) {
            DEFAULT_UK
        } else {
            DEFAULT_UNKNOWN
        }
    }
}

fn has_job_hint(text: &str) -> bool {
    let lower = text.to_lowercase();
    JOB_HINTS.iter().any(|hint| lower.contains(hint))
}
