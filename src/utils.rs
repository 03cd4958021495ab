//! Utility functions for week labelling, string cleanup, and file system checks.
//!
//! - Week labelling in the Europe/London time zone
//! - Whitespace collapsing for scraped text
//! - Slugification for preview file names
//! - Output directory validation

use chrono::{DateTime, Datelike, Days, Utc};
use chrono_tz::Europe::London;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Label for the London week containing `now`.
///
/// The instant is converted to Europe/London local time and normalized to
/// that week's Monday, giving e.g. `"Week of 13 Oct 2025"`.
pub fn london_week_label(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&London).date_naive();
    let monday = local
        .checked_sub_days(Days::new(u64::from(local.weekday().num_days_from_monday())))
        .unwrap_or(local);
    let label = monday.format("Week of %d %b %Y").to_string();
    tracing::debug!(%now, %label, "Computed week label");
    label
}

/// Collapse runs of whitespace (including newlines and NBSP) to one space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a label to a file-name-friendly slug.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Week of 13 Oct 2025"), "week-of-13-oct-2025");
/// ```
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
