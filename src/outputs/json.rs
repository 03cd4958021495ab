//! Preview output written instead of sending mail.
//!
//! Both files are named after the week label so consecutive weeks sit side
//! by side in the same directory. Re-running within a week overwrites.

use crate::models::Listing;
use crate::outputs::html::RenderedDigest;
use crate::utils::{ensure_writable_dir, slugify};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct PreviewDocument<'a> {
    week_label: &'a str,
    subject: &'a str,
    count: usize,
    listings: &'a [Listing],
}

/// Write `{slug}.html` and `{slug}.json` into `preview_dir`.
///
/// # Returns
///
/// The paths of the HTML and JSON files, in that order.
#[instrument(level = "info", skip_all, fields(%preview_dir, %week_label))]
pub async fn write_preview(
    preview_dir: &str,
    week_label: &str,
    digest: &RenderedDigest,
    listings: &[Listing],
) -> Result<(PathBuf, PathBuf), Box<dyn Error>> {
    ensure_writable_dir(preview_dir).await?;

    let stem = slugify(week_label);
    let html_path = PathBuf::from(preview_dir).join(format!("{stem}.html"));
    let json_path = PathBuf::from(preview_dir).join(format!("{stem}.json"));

    let doc = PreviewDocument {
        week_label,
        subject: &digest.subject,
        count: listings.len(),
        listings,
    };
    let json = serde_json::to_string_pretty(&doc)?;

    fs::write(&html_path, &digest.body).await?;
    fs::write(&json_path, json).await?;
    info!(html = %html_path.display(), json = %json_path.display(), "Wrote preview");

    Ok((html_path, json_path))
}
