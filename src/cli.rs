//! Command-line interface definitions for the opportunity digest.
//!
//! Every option can also come from the environment, which is how scheduled
//! runs (cron, CI) supply the mail credentials.

use crate::error::ConfigError;
use clap::Parser;

/// Search job boards for keyword matches and email a weekly digest.
///
/// # Examples
///
/// ```sh
/// # Send the digest
/// EMAIL_USERNAME=me@gmail.com EMAIL_PASSWORD=app-password opportunity_digest -c config.yaml
///
/// # Render to a directory without sending
/// opportunity_digest -c config.yaml --preview-dir ./preview
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, env = "OPPORTUNITY_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Account used to send the digest; also the default recipient
    #[arg(long, env = "EMAIL_USERNAME")]
    pub email_username: Option<String>,

    /// Password (or app password) for the sending account
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// Write the digest to this directory instead of sending it
    #[arg(short, long)]
    pub preview_dir: Option<String>,
}

impl Cli {
    /// Username and password for sending, both required and non-blank.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let user = non_blank(&self.email_username)
            .ok_or(ConfigError::MissingCredential("EMAIL_USERNAME"))?;
        let pass = non_blank(&self.email_password)
            .ok_or(ConfigError::MissingCredential("EMAIL_PASSWORD"))?;
        Ok((user, pass))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
