//! JSON output for the presentation layer.
//!
//! One file per tracked page, overwritten on every run:
//! ```text
//! json_output_dir/
//! └── portal-current-events.json
//! ```

use crate::models::CurrentEventsPage;
use crate::utils::page_slug;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`CurrentEventsPage`] to `{json_output_dir}/{slug}.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_page(
    page: &CurrentEventsPage,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(page)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = format!(
        "{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        page_slug(&page.page)
    );
    fs::write(&path, json).await?;
    info!(
        %path,
        editions = page.editions.len(),
        headlines = page.headlines.len(),
        "Wrote JSON file"
    );
    Ok(path)
}
