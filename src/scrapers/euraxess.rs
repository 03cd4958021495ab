//! EURAXESS research job search.
//!
//! Job offers are numbered: `/jobs/<id>`. The search page itself is also
//! under `/jobs/`, so the first segment must be numeric.

use super::{Extractor, search_url};
use crate::models::SourceId;
use url::Url;

const BASE_URL: &str = "https://euraxess.ec.europa.eu";

#[derive(Debug, Clone)]
pub struct Euraxess {
    base: Url,
}

impl Euraxess {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl Default for Euraxess {
    fn default() -> Self {
        Self::with_base(Url::parse(BASE_URL).unwrap())
    }
}

impl Extractor for Euraxess {
    fn id(&self) -> SourceId {
        SourceId::Euraxess
    }

    fn targets(&self, keywords: &[String]) -> Vec<String> {
        keywords
            .iter()
            .filter_map(|kw| search_url(&self.base, "/jobs/search", &[("keywords", kw)]))
            .collect()
    }

    fn is_listing(&self, url: &Url) -> bool {
        url.path()
            .strip_prefix("/jobs/")
            .and_then(|rest| rest.split('/').next())
            .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
    }

    fn default_organization(&self, _page: &Url) -> String {
        "EURAXESS listing".to_string()
    }
}
