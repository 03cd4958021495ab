//! Location and organization inference over free text.
//!
//! Every function here is total: inference falls back to a default rather
//! than failing, since third-party markup gives no guarantees.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_UK: &str = "United Kingdom";
pub const DEFAULT_UNKNOWN: &str = "Unknown/Remote";

/// Lower-case tokens whose presence marks a location as being in the UK.
const UK_GAZETTEER: &[&str] = &[
    "united kingdom",
    "great britain",
    "britain",
    "england",
    "scotland",
    "wales",
    "northern ireland",
    "london",
    "oxford",
    "cambridge",
    "manchester",
    "edinburgh",
    "glasgow",
    "bristol",
    "birmingham",
    "leeds",
    "liverpool",
    "sheffield",
    "nottingham",
    "newcastle",
    "southampton",
    "cardiff",
    "belfast",
    "derry",
    "coleraine",
    "york",
    "brighton",
    "aberdeen",
    "dundee",
    "exeter",
    "leicester",
    "coventry",
];

// "uk" is too short for plain containment ("ukraine").
static UK_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\buk\b").unwrap());

/// Places searched for in listing context, highest priority first.
/// Each entry is (pattern, label reported as the location).
static PLACES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bLondon\b", "London"),
        (r"\bCambridge\b", "Cambridge"),
        (r"\bOxford\b", "Oxford"),
        (r"\bManchester\b", "Manchester"),
        (r"\bEdinburgh\b", "Edinburgh"),
        (r"\bGlasgow\b", "Glasgow"),
        (r"\bBristol\b", "Bristol"),
        (r"\bBirmingham\b", "Birmingham"),
        (r"\bLeeds\b", "Leeds"),
        (r"\bLiverpool\b", "Liverpool"),
        (r"\bSheffield\b", "Sheffield"),
        (r"\bNottingham\b", "Nottingham"),
        (r"\bNewcastle\b", "Newcastle"),
        (r"\bSouthampton\b", "Southampton"),
        (r"\bCardiff\b", "Cardiff"),
        (r"\bBelfast\b", "Belfast"),
        (r"\b(?:Derry|Londonderry)\b", "Derry"),
        (r"\bColeraine\b", "Coleraine"),
        (r"\bNew York\b", "United States"),
        (r"\bYork\b", "York"),
        (r"\bBrighton\b", "Brighton"),
        (r"\bScotland\b", "Scotland"),
        (r"\bNew South Wales\b", "Australia"),
        (r"\bWales\b", "Wales"),
        (r"\bEngland\b", "England"),
        (r"\bNorthern Ireland\b", "Northern Ireland"),
        (r"\b(?:United Kingdom|UK|Great Britain)\b", DEFAULT_UK),
        (r"\bGermany\b", "Germany"),
        (r"\b(?:Netherlands|Holland)\b", "Netherlands"),
        (r"\bFrance\b", "France"),
        (r"\bSpain\b", "Spain"),
        (r"\bItaly\b", "Italy"),
        (r"\bSwitzerland\b", "Switzerland"),
        (r"\bSweden\b", "Sweden"),
        (r"\bDenmark\b", "Denmark"),
        (r"\bIreland\b", "Ireland"),
        (r"\b(?:USA|United States)\b", "United States"),
        (r"\bCanada\b", "Canada"),
        (r"\bAustralia\b", "Australia"),
        (r"\bRemote\b", "Remote"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(&format!("(?i){pattern}")).unwrap(), label))
    .collect()
});

/// Employer and institution shapes, highest priority first.
static ORGANIZATIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bUniversity of(?:\s+[A-Z][\w'’-]*){1,3}",
        r"\b(?:[A-Z][\w'’&-]*\s+){1,3}University\b",
        r"\b(?:[A-Z][\w'’&-]*\s+){1,3}College(?:\s+London)?\b",
        r"\b(?:[A-Z][\w'’&-]*\s+){0,3}Institute(?:\s+(?:of|for)(?:\s+[A-Z][\w'’-]*){1,3})?",
        r"\b(?:[A-Z][\w'’&-]*\s+){1,3}(?:NHS\s+)?(?:Foundation\s+)?Trust\b",
        r"\b(?:[A-Z][\w'’&-]*\s+){1,3}(?:Ltd|Limited|Inc)\b\.?",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// True when the text names a UK place or the UK itself.
pub fn is_uk(location: &str) -> bool {
    let lower = location.to_lowercase();
    UK_GAZETTEER.iter().any(|token| lower.contains(token)) || UK_TOKEN.is_match(&lower)
}

/// 1 when the text mentions London, else 0. Used only as a ranking signal.
pub fn london_score(location: &str) -> u8 {
    u8::from(location.to_lowercase().contains("london"))
}

/// First known place mentioned in `context`, by fixed priority.
pub fn find_place(context: &str) -> Option<&'static str> {
    PLACES
        .iter()
        .find(|(re, _)| re.is_match(context))
        .map(|(_, label)| *label)
}

/// First employer or institution name mentioned in `context`, by fixed priority.
///
/// Each line is searched on its own, so a name never spans two lines.
pub fn find_organization(context: &str) -> Option<String> {
    ORGANIZATIONS
        .iter()
        .find_map(|re| context.lines().find_map(|line| re.find(line)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
