//! Merge, deduplicate, rank, and cap listings from every enabled source.
//!
//! Sources run one after another in configured order. Ranking happens only
//! once every source has finished, so the result depends on the full set.

use crate::config::Config;
use crate::http::Fetch;
use crate::location::london_score;
use crate::models::Listing;
use crate::scrapers::{ExtractOptions, Extractor, run_source};
use futures::stream::{self, StreamExt};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Run `extractors` in order and return the ranked result set.
///
/// Every source finishes before anything is ranked, so duplicates resolve to
/// the first source in configured order.
///
/// # Arguments
///
/// * `config` - Keywords, caps, UK restriction and London preference
/// * `fetcher` - Network capability shared by all sources
/// * `extractors` - Enabled sources, in configured order
///
/// # Returns
///
/// At most `config.total_cap` listings (unbounded when zero), unique by link.
#[instrument(level = "info", skip_all, fields(sources = extractors.len()))]
pub async fn gather<F: Fetch>(
    config: &Config,
    fetcher: &F,
    extractors: &[Box<dyn Extractor>],
) -> Vec<Listing> {
    let opts = ExtractOptions::from_config(config);
    let opts = &opts;

    let per_source: Vec<Vec<Listing>> = stream::iter(extractors)
        .then(move |source| run_source(source.as_ref(), fetcher, opts))
        .collect()
        .await;

    let raw = per_source.into_iter().flatten().collect::<Vec<_>>();
    info!(count = raw.len(), "Collected raw listings");

    let ranked = rank(raw, config.total_cap, config.prefer_london);
    info!(count = ranked.len(), "Ranked listings");
    ranked
}

/// Deduplicate by link, sort by the ranking key, and truncate.
///
/// The key is London score (only when `prefer_london`), then number of
/// matched keywords, both descending, then source identifier ascending. The
/// sort is stable so equal keys keep collection order. A `total_cap` of
/// zero disables truncation.
///
/// # Arguments
///
/// * `listings` - Collected listings, in collection order
/// * `total_cap` - Maximum number kept
/// * `prefer_london` - Whether London-located listings sort first
///
/// # Returns
///
/// The ranked, truncated listings.
pub fn rank(
    listings: impl IntoIterator<Item = Listing>,
    total_cap: usize,
    prefer_london: bool,
) -> Vec<Listing> {
    let mut seen = HashSet::new();
    let mut ranked = dedupe_by_link(listings, &mut seen);
    ranked.sort_by(|a, b| compare(a, b, prefer_london));
    if total_cap > 0 {
        ranked.truncate(total_cap);
    }
    ranked
}

/// Keep the first listing per link; `seen` accumulates links across calls.
pub fn dedupe_by_link(
    listings: impl IntoIterator<Item = Listing>,
    seen: &mut HashSet<String>,
) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| seen.insert(l.link().to_string()))
        .collect()
}

fn compare(a: &Listing, b: &Listing, prefer_london: bool) -> Ordering {
    let london = |l: &Listing| {
        if prefer_london {
            Reverse(london_score(l.location()))
        } else {
            Reverse(0)
        }
    };
    london(a)
        .cmp(&london(b))
        .then_with(|| Reverse(a.matched_keywords().len()).cmp(&Reverse(b.matched_keywords().len())))
        .then_with(|| a.source().as_str().cmp(b.source().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;
    use crate::scrapers::testing::StubFetcher;
    use crate::scrapers::{enabled_extractors, jobs_ac_uk::JobsAcUk, nature_careers::NatureCareers};
    use url::Url;

    fn listing(source: SourceId, link: &str, location: &str, kws: &[&str]) -> Listing {
        Listing::new(
            source,
            format!("Role at {link}"),
            "Some University",
            location,
            format!("https://jobs.test/{link}"),
            kws.iter().map(|k| k.to_string()).collect(),
        )
        .unwrap()
    }

    fn links(listings: &[Listing]) -> Vec<&str> {
        listings
            .iter()
            .map(|l| l.link().trim_start_matches("https://jobs.test/"))
            .collect()
    }

    #[test]
    fn test_duplicate_link_first_occurrence_wins() {
        let ranked = rank(
            vec![
                listing(SourceId::NatureCareers, "a", "Oxford", &["mri"]),
                listing(SourceId::FindAPhd, "a", "London", &["mri", "fmri"]),
            ],
            25,
            true,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].source(), SourceId::NatureCareers);
    }

    #[test]
    fn test_dedupe_accumulator_spans_batches() {
        let mut seen = HashSet::new();
        let first = dedupe_by_link(vec![listing(SourceId::Euraxess, "a", "Leeds", &["mri"])], &mut seen);
        let second = dedupe_by_link(
            vec![
                listing(SourceId::Generic, "a", "Leeds", &["mri"]),
                listing(SourceId::Generic, "b", "Leeds", &["mri"]),
            ],
            &mut seen,
        );
        assert_eq!(links(&first), vec!["a"]);
        assert_eq!(links(&second), vec!["b"]);
    }

    #[test]
    fn test_rank_order_london_then_matches_then_source() {
        let ranked = rank(
            vec![
                listing(SourceId::NatureCareers, "oxford-two", "Oxford", &["mri", "fmri"]),
                listing(SourceId::NatureCareers, "london-one", "London", &["mri"]),
                listing(SourceId::Euraxess, "leeds-two", "Leeds", &["mri", "fmri"]),
                listing(SourceId::FindAPhd, "london-one-phd", "London", &["mri"]),
                listing(SourceId::Generic, "london-two", "London, UK", &["mri", "fmri"]),
            ],
            0,
            true,
        );
        assert_eq!(
            links(&ranked),
            vec!["london-two", "london-one-phd", "london-one", "leeds-two", "oxford-two"]
        );
    }

    #[test]
    fn test_without_london_preference_location_is_ignored() {
        let ranked = rank(
            vec![
                listing(SourceId::JobsAcUk, "london-one", "London", &["mri"]),
                listing(SourceId::JobsAcUk, "oxford-two", "Oxford", &["mri", "fmri"]),
            ],
            0,
            false,
        );
        assert_eq!(links(&ranked), vec!["oxford-two", "london-one"]);
    }

    #[test]
    fn test_rank_is_deterministic_and_stable() {
        let input: Vec<Listing> = (0..10)
            .map(|i| listing(SourceId::Generic, &format!("same-key-{i}"), "Leeds", &["mri"]))
            .collect();
        let once = rank(input.clone(), 0, true);
        let twice = rank(input.clone(), 0, true);
        assert_eq!(once, twice);
        assert_eq!(once, input);
    }

    #[test]
    fn test_total_cap_keeps_top_ranked() {
        let mut input = Vec::new();
        for i in 0..25 {
            input.push(listing(SourceId::JobsAcUk, &format!("plain-{i}"), "Leeds", &["mri"]));
        }
        for i in 0..5 {
            input.push(listing(SourceId::JobsAcUk, &format!("london-{i}"), "London", &["mri"]));
        }
        let ranked = rank(input, 25, true);

        assert_eq!(ranked.len(), 25);
        let top = links(&ranked);
        assert_eq!(&top[..5], &["london-0", "london-1", "london-2", "london-3", "london-4"]);
        assert_eq!(top[24], "plain-19");
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(rank(Vec::new(), 25, true).is_empty());
    }

    #[tokio::test]
    async fn test_gather_with_no_sources_is_empty() {
        let config = Config::from_yaml("keywords: [mri]\nsources: []").unwrap();
        let extractors = enabled_extractors(&config);
        let fetcher = StubFetcher::default();
        assert!(gather(&config, &fetcher, &extractors).await.is_empty());
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gather_dedupes_across_sources_in_enabled_order() {
        let shared = "https://shared.test/job/1";
        let nature_page = format!(
            r#"<li><a href="{shared}">Research Fellow in MRI</a> Oxford</li>"#
        );
        let jobs_page = format!(
            r#"<li><a href="{shared}">Research Fellow in MRI</a> London</li>
               <li><a href="/job/2">MRI Physicist post</a> Leeds</li>"#
        );
        let fetcher = StubFetcher::default()
            .with_page("https://nature.test/naturecareers/jobs/search?keywords=mri&location=United+Kingdom", &nature_page)
            .with_page("https://jobs.test/search/?keywords=mri", &jobs_page);

        // Nature's own path filter would reject the shared link.
        struct AnyNature(NatureCareers);
        impl Extractor for AnyNature {
            fn id(&self) -> SourceId {
                self.0.id()
            }
            fn targets(&self, keywords: &[String]) -> Vec<String> {
                self.0.targets(keywords)
            }
            fn is_listing(&self, url: &Url) -> bool {
                url.path().starts_with("/job/")
            }
            fn default_organization(&self, page: &Url) -> String {
                self.0.default_organization(page)
            }
        }

        let config = Config::from_yaml("keywords: [mri]\npoliteness_delay_ms: 0").unwrap();
        let extractors: Vec<Box<dyn Extractor>> = vec![
            Box::new(AnyNature(NatureCareers::with_base(Url::parse("https://nature.test").unwrap()))),
            Box::new(JobsAcUk::with_base(Url::parse("https://jobs.test").unwrap())),
        ];
        let ranked = gather(&config, &fetcher, &extractors).await;

        assert_eq!(ranked.len(), 2);
        let shared_listing = ranked.iter().find(|l| l.link() == shared).unwrap();
        assert_eq!(shared_listing.source(), SourceId::NatureCareers);
        assert_eq!(shared_listing.location(), "Oxford");
    }
}
