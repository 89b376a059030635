//! Configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an absent file or a partial one is valid.
//! Command-line flags are applied on top by [`Config::apply_cli`].
//!
//! ```yaml
//! page: Portal:Current_events
//! ttl_secs: 600
//! placeholder_title: No events reported
//! selectors:
//!   citation_link: a.external
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::utils::page_slug;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_PAGE: &str = "Portal:Current_events";
pub const DEFAULT_TTL_SECS: u64 = 600;
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "No events reported";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MediaWiki API endpoint.
    pub api_url: String,
    /// Title of the page to parse.
    pub page: String,
    /// Maximum age of the cached document before a refetch is attempted.
    pub ttl_secs: u64,
    /// Cache key; derived from `page` when unset.
    pub cache_key: Option<String>,
    /// Title of the synthetic section used for days without content.
    pub placeholder_title: String,
    /// Drop records whose description is empty and that carry no sources.
    pub skip_empty_leaves: bool,
    /// Fetch attempts before giving up (first try included).
    pub max_attempts: usize,
    pub selectors: SelectorConfig,
}

/// CSS selectors describing the page layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One region per calendar day.
    pub day_region: String,
    /// Human-readable date label inside a day region.
    pub date_label: String,
    /// Machine-readable `YYYY-MM-DD` date inside the label.
    pub iso_date: String,
    /// Container of headings and lists inside a day region.
    pub content_region: String,
    /// Child of the content region that opens a topical section.
    pub section_heading: String,
    /// Links that cite an external source.
    pub citation_link: String,
    /// Box holding the flat headline list.
    pub headlines_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page: DEFAULT_PAGE.to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
            cache_key: None,
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
            skip_empty_leaves: false,
            max_attempts: 3,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            day_region: ".current-events-main".to_string(),
            date_label: ".current-events-title".to_string(),
            iso_date: ".bday".to_string(),
            content_region: ".current-events-content".to_string(),
            section_heading: ".current-events-content-heading, [role=\"heading\"]".to_string(),
            citation_link: "a.external".to_string(),
            headlines_region: ".p-current-events-headlines".to_string(),
        }
    }
}

impl Config {
    /// Load the config file at `path`, or the defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, page = %config.page, ttl_secs = config.ttl_secs, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Override file values with those given on the command line.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(ref api_url) = cli.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(ref page) = cli.page {
            self.page = page.clone();
        }
        if let Some(ttl) = cli.ttl_secs {
            self.ttl_secs = ttl;
        }
        self
    }

    /// The key the fetched document is cached under.
    pub fn cache_key(&self) -> String {
        self.cache_key
            .clone()
            .unwrap_or_else(|| page_slug(&self.page))
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_secs.saturating_mul(1_000)
    }
}
