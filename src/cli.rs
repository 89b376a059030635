//! Command-line interface definitions for Current Events Digest.
//!
//! Options can be given as flags, some also through environment variables.
//! Values given here override the YAML configuration file.

use clap::Parser;

/// Command-line arguments for the Current Events Digest application.
///
/// # Examples
///
/// ```sh
/// # Fetch (or reuse the cached copy of) the portal and write JSON
/// current_events_digest -j ./json
///
/// # Only the most recent day, with a shorter cache lifetime
/// current_events_digest -j ./json --days 1 --ttl-secs 60
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Directory holding the cached raw document
    #[arg(short, long, default_value = ".cache")]
    pub cache_dir: String,

    /// Optional path to a config.yaml file
    #[arg(long)]
    pub config: Option<String>,

    /// Cache time-to-live in seconds (overrides the config file)
    #[arg(long)]
    pub ttl_secs: Option<u64>,

    /// Number of day regions to assemble, most recent first (default: all)
    #[arg(short, long)]
    pub days: Option<usize>,

    /// Title of the page to parse
    #[arg(long, env = "CURRENT_EVENTS_PAGE")]
    pub page: Option<String>,

    /// MediaWiki API endpoint
    #[arg(long, env = "CURRENT_EVENTS_API_URL")]
    pub api_url: Option<String>,
}
