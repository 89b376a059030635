//! # Current Events Digest
//!
//! Extracts a structured record of current events from a news-portal page
//! organised as dated sections, each holding a tree of topic/subtopic list
//! items with embedded citation links.
//!
//! ## Usage
//!
//! ```sh
//! current_events_digest -j ./json
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: the raw page is served from the cache while it is younger
//!    than the TTL, otherwise refetched (stale copy served if the fetch fails)
//! 2. **Extraction**: every day region becomes an edition of topical sections
//!    and event records; headlines are scraped separately
//! 3. **Output**: the result is written as one JSON file

use clap::Parser;
use scraper::Html;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod utils;

use cache::SourceCache;
use cache::store::FileStore;
use cli::Cli;
use config::Config;
use extract::ExtractRules;
use fetch::{FetchSource, RetryFetch, WikipediaFetcher};
use models::CurrentEventsPage;
use outputs::json;
use utils::{ensure_writable_dir, now_millis};

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
    info!("current_events_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?.apply_cli(&args);
    let rules = ExtractRules::from_config(&config)?;

    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch through the cache ----
    let fetcher = RetryFetch::new(
        WikipediaFetcher::new(&config.api_url, &config.page)?,
        config.max_attempts,
        StdDuration::from_secs(1),
    );
    let fetcher = &fetcher;
    let mut source_cache = SourceCache::new(FileStore::new(&args.cache_dir));
    let key = config.cache_key();

    let document = match source_cache
        .get(&key, now_millis(), move || fetcher.fetch(), config.ttl_ms())
        .await
    {
        Ok(doc) => doc,
        Err(e) => {
            error!(error = %e, "No document available");
            return Err(e.into());
        }
    };
    info!(
        bytes = document.markup.len(),
        retrieved_at = document.retrieved_at,
        "Document ready"
    );

    // ---- Extract ----
    let html = Html::parse_document(&document.markup);

    let headlines = match extract::extract_headlines(&html, &rules) {
        Ok(headlines) => headlines,
        Err(e) => {
            warn!(error = %e, "Headlines unavailable; continuing without them");
            Vec::new()
        }
    };

    let available = extract::count_days(&html, &rules);
    info!(available, requested = ?args.days, "Assembling editions");
    let editions = match extract::assemble_editions(&html, args.days, &rules) {
        Ok(editions) => editions,
        Err(e) => {
            error!(error = %e, "Document is malformed");
            return Err(e.into());
        }
    };

    for edition in &editions {
        info!(
            date = %edition.date,
            sections = edition.sections.len(),
            records = edition.record_count(),
            "Edition assembled"
        );
    }

    // ---- Output ----
    let page = CurrentEventsPage {
        page: config.page.clone(),
        fetched_at: document.retrieved_at,
        headlines,
        editions,
    };
    if let Err(e) = json::write_page(&page, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        editions = page.editions.len(),
        headlines = page.headlines.len(),
        "Execution complete"
    );

    Ok(())
}
