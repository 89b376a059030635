//! Assembly of per-day editions and the headline list.
//!
//! A day region holds a date label and a content region. The content
//! region's direct children are read in order:
//!
//! ```text
//! NoSection --heading--> InSection
//! InSection --heading--> InSection   (flush, reopen)
//! InSection --list-----> InSection   (accumulate records)
//! end of children: flush the open section
//! ```
//!
//! A section is kept only when it produced at least one record. A day whose
//! content region has no heading, or keeps no section, becomes a placeholder
//! edition.

use super::dom::{child_elements, is_item, is_list, text_of};
use super::rules::ExtractRules;
use super::section::parse_section;
use crate::error::MalformedDocumentError;
use crate::models::{Edition, HeadlineItem, TopicalSection};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

/// Number of day regions in the document.
pub fn count_days(document: &Html, rules: &ExtractRules) -> usize {
    document.select(&rules.day_region).count()
}

/// Assemble the edition of the `day_index`-th day region.
///
/// # Errors
///
/// [`MalformedDocumentError`] when the region, its date label, or its
/// content region is missing. No partial edition is returned.
#[instrument(level = "debug", skip(document, rules))]
pub fn assemble_edition(
    document: &Html,
    day_index: usize,
    rules: &ExtractRules,
) -> Result<Edition, MalformedDocumentError> {
    let region = document
        .select(&rules.day_region)
        .nth(day_index)
        .ok_or(MalformedDocumentError::MissingRegion { day_index })?;

    let label = first_within(region, &rules.date_label, "date label", day_index)?;
    let date = text_of(label).trim().to_string();
    let published = label
        .select(&rules.iso_date)
        .next()
        .and_then(|el| NaiveDate::parse_from_str(text_of(el).trim(), "%Y-%m-%d").ok());

    let content = first_within(region, &rules.content_region, "content region", day_index)?;

    if !child_elements(content).any(|c| rules.is_heading(c)) {
        info!(%date, "No section headings; day has nothing reported");
        return Ok(Edition::placeholder(date, published, &rules.placeholder_title));
    }

    let sections = fold_sections(content, rules);
    if sections.is_empty() {
        info!(%date, "No section produced records; day has nothing reported");
        return Ok(Edition::placeholder(date, published, &rules.placeholder_title));
    }

    let edition = Edition {
        date,
        published,
        sections,
    };
    debug!(
        sections = edition.sections.len(),
        records = edition.record_count(),
        "Assembled edition"
    );
    Ok(edition)
}

/// Assemble the first `days` editions, or all of them when `days` is `None`.
///
/// Stops at the first malformed day.
pub fn assemble_editions(
    document: &Html,
    days: Option<usize>,
    rules: &ExtractRules,
) -> Result<Vec<Edition>, MalformedDocumentError> {
    let days = days.unwrap_or_else(|| count_days(document, rules));
    (0..days)
        .map(|day_index| assemble_edition(document, day_index, rules))
        .collect()
}

/// Flat list of headlines: one per top-level item of the first list inside
/// the headlines region.
///
/// # Errors
///
/// [`MalformedDocumentError::MissingElement`] when the region is absent.
pub fn extract_headlines(
    document: &Html,
    rules: &ExtractRules,
) -> Result<Vec<HeadlineItem>, MalformedDocumentError> {
    let region = document
        .select(&rules.headlines_region)
        .next()
        .ok_or_else(|| MalformedDocumentError::MissingElement {
            element: "headlines region".to_string(),
            context: "document".to_string(),
        })?;

    let Some(list) = region.descendants().filter_map(ElementRef::wrap).find(|e| is_list(*e))
    else {
        return Ok(Vec::new());
    };

    Ok(child_elements(list)
        .filter(|c| is_item(*c))
        .map(|item| HeadlineItem {
            text: text_of(item).trim().to_string(),
        })
        .collect())
}

fn first_within<'a>(
    region: ElementRef<'a>,
    selector: &Selector,
    element: &str,
    day_index: usize,
) -> Result<ElementRef<'a>, MalformedDocumentError> {
    region
        .select(selector)
        .next()
        .ok_or_else(|| MalformedDocumentError::MissingElement {
            element: element.to_string(),
            context: format!("day region {day_index}"),
        })
}

enum SectionState {
    NoSection,
    InSection(TopicalSection),
}

impl SectionState {
    /// Close the open section, keeping it only if it gathered records.
    fn flush_into(self, done: &mut Vec<TopicalSection>) {
        if let SectionState::InSection(section) = self {
            if section.items.is_empty() {
                debug!(title = %section.title, "Dropping section without records");
            } else {
                debug!(title = %section.title, records = section.items.len(), "Section closed");
                done.push(section);
            }
        }
    }
}

fn fold_sections(content: ElementRef<'_>, rules: &ExtractRules) -> Vec<TopicalSection> {
    let (mut done, open) = child_elements(content).fold(
        (Vec::new(), SectionState::NoSection),
        |(mut done, state), child| {
            if rules.is_heading(child) {
                state.flush_into(&mut done);
                let title = text_of(child).trim().to_string();
                (done, SectionState::InSection(TopicalSection::new(title)))
            } else if is_list(child) {
                match state {
                    SectionState::InSection(mut section) => {
                        section.items.extend(parse_section(child, rules));
                        (done, SectionState::InSection(section))
                    }
                    SectionState::NoSection => {
                        debug!("List before any section heading; ignored");
                        (done, SectionState::NoSection)
                    }
                }
            } else {
                (done, state)
            }
        },
    );
    open.flush_into(&mut done);
    done
}
