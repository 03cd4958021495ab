//! # Opportunity Digest
//!
//! Searches PhD and research job boards for postings that match a set of
//! keywords, keeps the ones in the target geography, ranks them, and emails
//! a weekly HTML digest.
//!
//! ## Usage
//!
//! ```sh
//! EMAIL_USERNAME=me@gmail.com EMAIL_PASSWORD=app-password opportunity_digest -c config.yaml
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Extraction**: Each enabled source is searched once per keyword (or once
//!    per configured site), one request at a time with a politeness delay
//! 2. **Aggregation**: Listings are deduplicated by link, ranked, and capped
//! 3. **Rendering**: The ranked list becomes an HTML digest for the London week
//! 4. **Delivery**: The digest is sent over SMTP, or written to a preview directory

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod digest;
mod error;
mod http;
mod location;
mod mail;
mod matcher;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::load_config;
use digest::{build_digest, deliver, recipient};
use http::HttpFetcher;
use mail::SmtpMailer;
use outputs::json::write_preview;

/// Where the rendered digest goes.
enum Delivery<'a> {
    Send { mailer: SmtpMailer, account: &'a str },
    Preview(&'a str),
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("opportunity_digest starting up");

    let args = Cli::parse();
    debug!(config = %args.config, preview_dir = ?args.preview_dir, "Parsed CLI arguments");

    // ---- Fatal checks before any network activity ----
    let config = load_config(&args.config).await.inspect_err(|e| {
        error!(error = %e, "Configuration error");
    })?;

    let delivery = match &args.preview_dir {
        Some(dir) => Delivery::Preview(dir),
        None => {
            let (username, password) = args.credentials().inspect_err(|e| {
                error!(error = %e, "Cannot send without credentials");
            })?;
            let mailer =
                SmtpMailer::new(&args.smtp_host, username, password, &config.sender_name)?;
            Delivery::Send {
                mailer,
                account: username,
            }
        }
    };

    // ---- Gather and render ----
    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let extractors = scrapers::enabled_extractors(&config);
    let digest = build_digest(&config, &fetcher, &extractors, Utc::now()).await;
    let sources = digest.source_count();

    // ---- Deliver ----
    match delivery {
        Delivery::Send { mailer, account } => {
            let to = recipient(&config, account);
            deliver(&mailer, to, &digest).await.inspect_err(|e| {
                error!(error = %e, %to, "Failed to send digest");
            })?;
            println!("Sent {} listings from {} sources.", digest.listings.len(), sources);
        }
        Delivery::Preview(dir) => {
            write_preview(dir, &digest.week_label, &digest.rendered, &digest.listings).await?;
            println!(
                "Wrote {} listings from {} sources to {}.",
                digest.listings.len(),
                sources,
                dir
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        listings = digest.listings.len(),
        sources,
        week = %digest.week_label,
        "Execution complete"
    );

    Ok(())
}
