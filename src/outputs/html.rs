//! HTML digest rendering.
//!
//! Produces the email subject and body for a ranked list of listings:
//!
//! ```text
//! header       greeting and focus line
//! listings     one block per listing, or a "no matches" notice
//! summary      total, London count, keywords matched
//! quick links  fixed job-board searches for the first keywords
//! ```
//!
//! Every scraped or configured string is escaped before it is embedded.
//! Text goes through [`encode_text`], link targets through
//! [`encode_double_quoted_attribute`].

use crate::config::Config;
use crate::location::london_score;
use crate::models::Listing;
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use std::fmt::Write;
use urlencoding::encode;

/// Keywords substituted into the quick search links.
const QUICK_LINK_KEYWORDS: usize = 4;

/// (label, URL template); `{q}` is replaced with the encoded query.
const QUICK_LINKS: &[(&str, &str)] = &[
    ("jobs.ac.uk", "https://www.jobs.ac.uk/search/?keywords={q}"),
    ("FindAPhD", "https://www.findaphd.com/phds/united-kingdom/?Keywords={q}"),
    (
        "Nature Careers",
        "https://www.nature.com/naturecareers/jobs/search?keywords={q}&location=United+Kingdom",
    ),
    ("EURAXESS", "https://euraxess.ec.europa.eu/jobs/search?keywords={q}"),
    ("LinkedIn", "https://www.linkedin.com/jobs/search/?keywords={q}&location=London"),
    ("Indeed", "https://uk.indeed.com/jobs?q={q}&l=London"),
];

/// A rendered digest ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDigest {
    pub subject: String,
    pub body: String,
}

pub fn subject_line(week_label: &str) -> String {
    format!("🎓 Weekly Opportunities in Neuroimaging & Brain Research – {week_label}")
}

/// Render the subject and HTML body for `listings`.
///
/// The body has a greeting, one block per listing (or a "no matches" notice),
/// a summary with total and London counts, and quick search links. Every
/// interpolated value is HTML-escaped.
///
/// # Arguments
///
/// * `listings` - Ranked listings, rendered in order
/// * `week_label` - Human-readable week, embedded in the subject
/// * `config` - Greeting, sender name, keywords and location preferences
///
/// # Returns
///
/// A [`RenderedDigest`] with the subject line and HTML body.
pub fn render_digest(listings: &[Listing], week_label: &str, config: &Config) -> RenderedDigest {
    let mut body = String::new();

    render_header(&mut body, config);

    if listings.is_empty() {
        body.push_str(
            "\n<hr>\n<p class=\"no-matches\"><em>No matches found this week.</em> \
             The quick searches below are worth a look.</p>\n",
        );
    }
    for listing in listings {
        render_listing(&mut body, listing);
    }

    render_summary(&mut body, listings);
    render_quick_links(&mut body, &config.keywords);

    writeln!(
        body,
        "\n<p>Best,<br>\n{}</p>",
        encode_text(&config.sender_name)
    )
    .unwrap();

    RenderedDigest {
        subject: subject_line(week_label),
        body,
    }
}

/// Quick search (label, URL) pairs for the first few keywords.
pub fn quick_links(keywords: &[String]) -> Vec<(&'static str, String)> {
    let query = keywords.iter().take(QUICK_LINK_KEYWORDS).join(" ");
    let encoded = encode(&query);
    QUICK_LINKS
        .iter()
        .map(|(label, template)| (*label, template.replace("{q}", &encoded)))
        .collect()
}

fn focus_phrase(config: &Config) -> &'static str {
    match (config.restrict_to_uk, config.prefer_london) {
        (true, true) => "UK focus, prioritising London",
        (true, false) => "UK focus",
        (false, true) => "all locations, prioritising London",
        (false, false) => "all locations",
    }
}

fn render_header(body: &mut String, config: &Config) {
    let greeting = match &config.greeting_name {
        Some(name) => format!("Hi {},", encode_text(name)),
        None => "Hi,".to_string(),
    };
    writeln!(
        body,
        "<h2>🎓 Weekly Opportunities</h2>\n<p>{greeting}</p>\n\
         <p>Here are this week’s new <b>PhD, RA, and industry</b> roles matching your keywords ({}):</p>",
        focus_phrase(config)
    )
    .unwrap();
}

fn render_listing(body: &mut String, listing: &Listing) {
    writeln!(
        body,
        "\n<hr>\n<div class=\"listing\">\n\
         <h3>{emoji} {title} – {org}</h3>\n\
         <p><strong>Deadline:</strong> {deadline}<br>\n\
         <strong>Location:</strong> {location}<br>\n\
         <strong>Source:</strong> {source}<br>\n\
         <strong>Keywords matched:</strong> {keywords}<br>\n\
         <a href=\"{link}\">View listing</a></p>\n\
         </div>",
        emoji = listing.emoji(),
        title = encode_text(listing.title()),
        org = encode_text(listing.organization()),
        deadline = encode_text(listing.deadline()),
        location = encode_text(listing.location()),
        source = encode_text(listing.source().label()),
        keywords = encode_text(&listing.matched_keywords().join(", ")),
        link = encode_double_quoted_attribute(listing.link()),
    )
    .unwrap();
}

fn render_summary(body: &mut String, listings: &[Listing]) {
    let total = listings.len();
    let london = listings
        .iter()
        .filter(|l| london_score(l.location()) == 1)
        .count();
    let keywords = listings
        .iter()
        .flat_map(|l| l.matched_keywords())
        .sorted()
        .dedup()
        .join(", ");
    let noun = if total == 1 { "opportunity" } else { "opportunities" };

    writeln!(
        body,
        "\n<hr>\n<p><b>Summary:</b><br>\n\
         - {total} {noun} this week<br>\n\
         - {london} in London<br>\n\
         - Keywords matched: {}</p>",
        if keywords.is_empty() {
            "none".into()
        } else {
            encode_text(&keywords)
        }
    )
    .unwrap();
}

fn render_quick_links(body: &mut String, keywords: &[String]) {
    let links = quick_links(keywords)
        .iter()
        .map(|(label, url)| {
            format!(
                "<a href=\"{}\">{}</a>",
                encode_double_quoted_attribute(url),
                encode_text(label)
            )
        })
        .join(" · ");
    writeln!(body, "\n<p><b>Quick searches:</b><br>\n{links}</p>").unwrap();
}
