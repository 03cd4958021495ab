//! jobs.ac.uk keyword search.
//!
//! Job adverts live under `/job/<ref>/<slug>`; everything else on the
//! results page (filters, pagination, employer hubs) is ignored.

use super::{Extractor, search_url};
use crate::models::SourceId;
use url::Url;

const BASE_URL: &str = "https://www.jobs.ac.uk";

#[derive(Debug, Clone)]
pub struct JobsAcUk {
    base: Url,
}

impl JobsAcUk {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl Default for JobsAcUk {
    fn default() -> Self {
        Self::with_base(Url::parse(BASE_URL).unwrap())
    }
}

impl Extractor for JobsAcUk {
    fn id(&self) -> SourceId {
        SourceId::JobsAcUk
    }

    fn targets(&self, keywords: &[String]) -> Vec<String> {
        keywords
            .iter()
            .filter_map(|kw| search_url(&self.base, "/search/", &[("keywords", kw)]))
            .collect()
    }

    fn is_listing(&self, url: &Url) -> bool {
        url.path().starts_with("/job/")
    }

    fn default_organization(&self, _page: &Url) -> String {
        "jobs.ac.uk listing".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpFetcher;
    use crate::scrapers::run_source;
    use crate::scrapers::testing::{keywords, opts};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS: &str = r#"
        <div class="j-search-result__result">
          <div class="j-search-result__text">
            <a href="/job/DMK123/research-assistant-fmri-and-drug-studies">Research Assistant - fMRI &amp; Drug Studies</a>
            <div class="j-search-result__employer"><b>King's College London</b></div>
            <div>Location: London</div>
          </div>
        </div>
        <div class="j-search-result__result">
          <div class="j-search-result__text">
            <a href="/job/DMK456/lecturer-in-psychology">Lecturer in Psychology</a>
            <div class="j-search-result__employer"><b>University of Glasgow</b></div>
          </div>
        </div>
        <a href="/search/?keywords=fmri&startIndex=26">Next</a>
    "#;

    #[tokio::test]
    async fn test_extracts_from_live_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/"))
            .and(query_param("keywords", "fmri"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/"))
            .and(query_param("keywords", "eeg"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let source = JobsAcUk::with_base(Url::parse(&server.uri()).unwrap());
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let kws = keywords(&["eeg", "fmri"]);
        let listings = run_source(&source, &fetcher, &opts(&kws)).await;

        assert_eq!(listings.len(), 1);
        let job = &listings[0];
        assert_eq!(job.title(), "Research Assistant - fMRI & Drug Studies");
        assert_eq!(
            job.link(),
            format!("{}/job/DMK123/research-assistant-fmri-and-drug-studies", server.uri())
        );
        assert_eq!(job.organization(), "King's College London");
        assert_eq!(job.location(), "London");
        assert_eq!(job.matched_keywords(), &["fmri".to_string()]);
    }

    #[test]
    fn test_is_listing() {
        let source = JobsAcUk::default();
        assert!(source.is_listing(&Url::parse("https://www.jobs.ac.uk/job/DMK123/x").unwrap()));
        assert!(!source.is_listing(&Url::parse("https://www.jobs.ac.uk/search/?keywords=x").unwrap()));
        assert!(!source.is_listing(&Url::parse("https://www.jobs.ac.uk/employer/ucl").unwrap()));
    }
}
