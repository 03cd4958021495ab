//! Data models for scraped listings and the sources that produce them.
//!
//! - [`SourceId`]: identifier of a built-in extractor
//! - [`Listing`]: a normalized posting, the unit of aggregation and rendering
//!
//! A [`Listing`] can only be built through [`Listing::new`], which refuses
//! records without a keyword match or without an absolute link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown in the deadline slot; deadlines are not extracted.
pub const DEADLINE_PLACEHOLDER: &str = "see listing";

/// Identifier of a built-in extractor.
///
/// The serialized form doubles as the configuration token and as the
/// ascending tie-break key when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    #[serde(rename = "findaphd")]
    FindAPhd,
    JobsAcUk,
    PsychedelicAlpha,
    NatureCareers,
    Euraxess,
    Generic,
}

impl SourceId {
    /// All built-in sources in their default order.
    pub const ALL: [SourceId; 6] = [
        SourceId::FindAPhd,
        SourceId::JobsAcUk,
        SourceId::PsychedelicAlpha,
        SourceId::NatureCareers,
        SourceId::Euraxess,
        SourceId::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::FindAPhd => "findaphd",
            SourceId::JobsAcUk => "jobs_ac_uk",
            SourceId::PsychedelicAlpha => "psychedelic_alpha",
            SourceId::NatureCareers => "nature_careers",
            SourceId::Euraxess => "euraxess",
            SourceId::Generic => "generic",
        }
    }

    /// Human-readable name used in the digest.
    pub fn label(self) -> &'static str {
        match self {
            SourceId::FindAPhd => "FindAPhD",
            SourceId::JobsAcUk => "jobs.ac.uk",
            SourceId::PsychedelicAlpha => "Psychedelic Alpha",
            SourceId::NatureCareers => "Nature Careers",
            SourceId::Euraxess => "EURAXESS",
            SourceId::Generic => "Institution site",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single job, PhD, or research role posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    source: SourceId,
    title: String,
    organization: String,
    location: String,
    deadline: String,
    link: String,
    matched_keywords: Vec<String>,
}

impl Listing {
    /// Build a listing, or `None` when the record would be invalid.
    ///
    /// Rejected when `matched_keywords` is empty, when `title` is blank, or
    /// when `link` does not parse as an absolute URL.
    pub fn new(
        source: SourceId,
        title: impl Into<String>,
        organization: impl Into<String>,
        location: impl Into<String>,
        link: impl Into<String>,
        matched_keywords: Vec<String>,
    ) -> Option<Self> {
        let title = title.into();
        let link = link.into();
        if matched_keywords.is_empty() || title.trim().is_empty() {
            return None;
        }
        url::Url::parse(&link).ok()?;
        Some(Self {
            source,
            title,
            organization: organization.into(),
            location: location.into(),
            deadline: DEADLINE_PLACEHOLDER.to_string(),
            link,
            matched_keywords,
        })
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    /// Canonical absolute URL; the identity key for deduplication.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    /// Emoji marking the kind of opportunity in the digest.
    pub fn emoji(&self) -> &'static str {
        let title = self.title.to_lowercase();
        let org = self.organization.trim_end_matches('.');
        if self.source == SourceId::FindAPhd || title.contains("phd") {
            "🎓"
        } else if self.source == SourceId::PsychedelicAlpha
            || ["Ltd", "Limited", "Inc"].iter().any(|s| org.ends_with(s))
        {
            "💼"
        } else {
            "🧠"
        }
    }
}
