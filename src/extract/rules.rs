//! Compiled selector set describing the page layout.

use crate::config::{Config, SelectorConfig};
use crate::error::ConfigError;
use scraper::{ElementRef, Selector};

/// Parsed selectors plus the extraction policy knobs.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub day_region: Selector,
    pub date_label: Selector,
    pub iso_date: Selector,
    pub content_region: Selector,
    pub section_heading: Selector,
    pub citation_link: Selector,
    pub headlines_region: Selector,
    pub placeholder_title: String,
    pub skip_empty_leaves: bool,
}

fn compile(field: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::Selector {
        field,
        selector: css.to_string(),
        reason: format!("{e:?}"),
    })
}

impl ExtractRules {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let SelectorConfig {
            day_region,
            date_label,
            iso_date,
            content_region,
            section_heading,
            citation_link,
            headlines_region,
        } = &config.selectors;

        Ok(Self {
            day_region: compile("day_region", day_region)?,
            date_label: compile("date_label", date_label)?,
            iso_date: compile("iso_date", iso_date)?,
            content_region: compile("content_region", content_region)?,
            section_heading: compile("section_heading", section_heading)?,
            citation_link: compile("citation_link", citation_link)?,
            headlines_region: compile("headlines_region", headlines_region)?,
            placeholder_title: config.placeholder_title.clone(),
            skip_empty_leaves: config.skip_empty_leaves,
        })
    }

    pub fn is_citation(&self, el: ElementRef<'_>) -> bool {
        self.citation_link.matches(&el)
    }

    pub fn is_heading(&self, el: ElementRef<'_>) -> bool {
        self.section_heading.matches(&el)
    }
}
