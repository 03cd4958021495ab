//! FindAPhD studentship search.
//!
//! Searches the UK listings for each keyword; project pages live under
//! `/phds/project/<slug>/?p<id>`.

use super::{Extractor, search_url};
use crate::models::SourceId;
use url::Url;

const BASE_URL: &str = "https://www.findaphd.com";

#[derive(Debug, Clone)]
pub struct FindAPhd {
    base: Url,
}

impl FindAPhd {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl Default for FindAPhd {
    fn default() -> Self {
        Self::with_base(Url::parse(BASE_URL).unwrap())
    }
}

impl Extractor for FindAPhd {
    fn id(&self) -> SourceId {
        SourceId::FindAPhd
    }

    fn targets(&self, keywords: &[String]) -> Vec<String> {
        keywords
            .iter()
            .filter_map(|kw| search_url(&self.base, "/phds/united-kingdom/", &[("Keywords", kw)]))
            .collect()
    }

    fn is_listing(&self, url: &Url) -> bool {
        url.path().contains("/phds/project/")
    }

    fn default_organization(&self, _page: &Url) -> String {
        "FindAPhD listing".to_string()
    }
}
