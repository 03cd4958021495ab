//! Run configuration loaded from a YAML file.
//!
//! The document is parsed once at startup and normalized: keywords become a
//! lower-case ordered set and duplicate source identifiers collapse to their
//! first occurrence. Anything malformed is a fatal [`ConfigError`].
//!
//! ```yaml
//! recipient: someone@example.com
//! sender_name: Weekly Opportunity Finder
//! greeting_name: Benja
//! roles: [PhD, Research Assistant]
//! keywords: [fMRI, MRI, neuroimaging, psychedelic]
//! restrict_to_uk: true
//! prefer_london: true
//! per_source_cap: 8
//! total_cap: 25
//! sources: [findaphd, jobs_ac_uk, psychedelic_alpha, nature_careers, euraxess, generic]
//! generic_sites:
//!   - https://www.kcl.ac.uk/jobs
//! ```

use crate::error::ConfigError;
use crate::models::SourceId;
use itertools::Itertools;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Digest recipient; the sending account itself when absent.
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// Name used in the digest salutation.
    #[serde(default)]
    pub greeting_name: Option<String>,
    /// Role names; logged only.
    #[serde(default)]
    pub roles: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub restrict_to_uk: bool,
    #[serde(default = "default_true")]
    pub prefer_london: bool,
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: usize,
    /// Zero disables truncation.
    #[serde(default = "default_total_cap")]
    pub total_cap: usize,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceId>,
    #[serde(default)]
    pub generic_sites: Vec<String>,
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_sender_name() -> String {
    "Weekly Opportunity Finder".to_string()
}

fn default_true() -> bool {
    true
}

fn default_per_source_cap() -> usize {
    8
}

fn default_total_cap() -> usize {
    25
}

fn default_sources() -> Vec<SourceId> {
    SourceId::ALL.to_vec()
}

fn default_politeness_delay_ms() -> u64 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    20
}

impl Config {
    /// Parse and normalize a YAML document.
    pub fn from_yaml(doc: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(doc)?;
        config.normalized()
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.keywords = self
            .keywords
            .iter()
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .unique()
            .collect();
        if self.keywords.is_empty() {
            return Err(ConfigError::Invalid("at least one keyword is required".into()));
        }

        self.sources = self.sources.into_iter().unique().collect();
        self.generic_sites = self
            .generic_sites
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.recipient = self
            .recipient
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(self)
    }
}

/// Read and parse the configuration file at `path`.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_config(path: &str) -> Result<Config, ConfigError> {
    let doc = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
    let config = Config::from_yaml(&doc)?;
    info!(
        keywords = config.keywords.len(),
        roles = config.roles.len(),
        sources = config.sources.len(),
        generic_sites = config.generic_sites.len(),
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml("keywords: [fmri]").unwrap();
        assert_eq!(config.recipient, None);
        assert_eq!(config.sender_name, "Weekly Opportunity Finder");
        assert!(config.restrict_to_uk);
        assert!(config.prefer_london);
        assert_eq!(config.per_source_cap, 8);
        assert_eq!(config.total_cap, 25);
        assert_eq!(config.sources, SourceId::ALL.to_vec());
        assert!(config.generic_sites.is_empty());
        assert_eq!(config.politeness_delay(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_keywords_normalized_to_ordered_set() {
        let config = Config::from_yaml("keywords: [' fMRI ', MRI, fmri, '', Brain]").unwrap();
        assert_eq!(config.keywords, vec!["fmri", "mri", "brain"]);
    }

    #[test]
    fn test_duplicate_sources_collapse() {
        let config =
            Config::from_yaml("keywords: [mri]\nsources: [euraxess, findaphd, euraxess]").unwrap();
        assert_eq!(config.sources, vec![SourceId::Euraxess, SourceId::FindAPhd]);
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = Config::from_yaml("keywords: [mri]\nsources: [linkedin]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_keywords_rejected() {
        assert!(matches!(
            Config::from_yaml("sender_name: x").unwrap_err(),
            ConfigError::Parse(_)
        ));
        assert!(matches!(
            Config::from_yaml("keywords: ['  ']").unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_blank_recipient_treated_as_absent() {
        let config = Config::from_yaml("keywords: [mri]\nrecipient: '  '").unwrap();
        assert_eq!(config.recipient, None);
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "keywords: [fmri, mri]\ntotal_cap: 2\ngeneric_sites: ['https://www.kcl.ac.uk/jobs']\n",
        )
        .unwrap();

        let config = load_config(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.keywords, vec!["fmri", "mri"]);
        assert_eq!(config.total_cap, 2);
        assert_eq!(config.generic_sites, vec!["https://www.kcl.ac.uk/jobs"]);
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let err = load_config("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
