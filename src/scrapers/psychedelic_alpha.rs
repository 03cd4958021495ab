//! Psychedelic Alpha jobs board.
//!
//! Industry-heavy board; postings are `/jobs/<slug>`. Listing indexes such as
//! `/jobs/page/2` and `/jobs/category/...` share the prefix and are skipped.

use super::{Extractor, search_url};
use crate::models::SourceId;
use url::Url;

const BASE_URL: &str = "https://psychedelicalpha.com";

const INDEX_SEGMENTS: &[&str] = &["page", "category", "tag", "search", "feed"];

#[derive(Debug, Clone)]
pub struct PsychedelicAlpha {
    base: Url,
}

impl PsychedelicAlpha {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl Default for PsychedelicAlpha {
    fn default() -> Self {
        Self::with_base(Url::parse(BASE_URL).unwrap())
    }
}

impl Extractor for PsychedelicAlpha {
    fn id(&self) -> SourceId {
        SourceId::PsychedelicAlpha
    }

    fn targets(&self, keywords: &[String]) -> Vec<String> {
        keywords
            .iter()
            .filter_map(|kw| search_url(&self.base, "/jobs", &[("search", kw)]))
            .collect()
    }

    fn is_listing(&self, url: &Url) -> bool {
        let Some(rest) = url.path().strip_prefix("/jobs/") else {
            return false;
        };
        let first = rest.split('/').next().unwrap_or_default();
        !first.is_empty() && !INDEX_SEGMENTS.contains(&first)
    }

    fn default_organization(&self, _page: &Url) -> String {
        "Psychedelic Alpha listing".to_string()
    }
}
