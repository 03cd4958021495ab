//! Nature Careers job search, restricted to the United Kingdom.

use super::{Extractor, search_url};
use crate::models::SourceId;
use url::Url;

const BASE_URL: &str = "https://www.nature.com";

#[derive(Debug, Clone)]
pub struct NatureCareers {
    base: Url,
}

impl NatureCareers {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl Default for NatureCareers {
    fn default() -> Self {
        Self::with_base(Url::parse(BASE_URL).unwrap())
    }
}

impl Extractor for NatureCareers {
    fn id(&self) -> SourceId {
        SourceId::NatureCareers
    }

    fn targets(&self, keywords: &[String]) -> Vec<String> {
        keywords
            .iter()
            .filter_map(|kw| {
                search_url(
                    &self.base,
                    "/naturecareers/jobs/search",
                    &[("keywords", kw), ("location", "United Kingdom")],
                )
            })
            .collect()
    }

    fn is_listing(&self, url: &Url) -> bool {
        url.path().contains("/naturecareers/job/")
    }

    fn default_organization(&self, _page: &Url) -> String {
        "Nature Careers listing".to_string()
    }
}
