//! Data models for raw documents and the records extracted from them.
//!
//! - [`RawDocument`] / [`CacheEntry`]: the fetched markup and its cache slot
//! - [`Edition`]: one calendar day, split into [`TopicalSection`]s
//! - [`EventRecord`]: one reported happening with its [`SourceLink`]s
//! - [`HeadlineItem`]: flat headline list scraped outside the day regions
//! - [`CurrentEventsPage`]: everything one run hands to the presentation layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The raw markup of the source page together with the time it was retrieved.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawDocument {
    pub markup: String,
    pub retrieved_at: u64,
}

/// A stored document and the time it was stored, keyed by cache key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheEntry {
    pub value: RawDocument,
    pub fetched_at: u64,
}

impl CacheEntry {
    /// Age of the entry at `now`; a clock that runs backwards yields zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.fetched_at)
    }
}

/// A citation link pulled out of an event's text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceLink {
    /// Visible link text with the surrounding parentheses removed.
    pub name: String,
    /// The link target as written in the document, unvalidated.
    pub url: String,
}

/// One atomic reported happening.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventRecord {
    /// Inherited from the top-level item rooting this record's branch.
    pub topic: Option<String>,
    /// Set only when the leaf itself opens with a non-citation link.
    pub subtopic: Option<String>,
    pub description: String,
    pub sources: Vec<SourceLink>,
}

/// A titled group of event records under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicalSection {
    pub title: String,
    pub items: Vec<EventRecord>,
}

impl TopicalSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }
}

/// The extracted record for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Edition {
    /// The date label text of the day region, with surrounding whitespace
    /// trimmed. Inner text, including any hidden ISO date, is kept as is.
    pub date: String,
    /// Machine-readable date embedded in the label, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
    pub sections: Vec<TopicalSection>,
}

impl Edition {
    /// An edition for a day with nothing reported: a single placeholder
    /// section with no items.
    pub fn placeholder(
        date: impl Into<String>,
        published: Option<NaiveDate>,
        placeholder_title: &str,
    ) -> Self {
        Self {
            date: date.into(),
            published,
            sections: vec![TopicalSection::new(placeholder_title)],
        }
    }

    /// Total number of event records across all sections.
    pub fn record_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// One entry of the headlines box.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlineItem {
    pub text: String,
}

/// Output of one run: headlines plus every assembled edition.
#[derive(Debug, Deserialize, Serialize)]
pub struct CurrentEventsPage {
    /// The page title the document was fetched for.
    pub page: String,
    /// When the underlying document was retrieved (ms since epoch).
    pub fetched_at: u64,
    pub headlines: Vec<HeadlineItem>,
    pub editions: Vec<Edition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_age() {
        let entry = CacheEntry {
            value: RawDocument {
                markup: "<p></p>".to_string(),
                retrieved_at: 1_000,
            },
            fetched_at: 1_000,
        };
        assert_eq!(entry.age(1_500), 500);
        assert_eq!(entry.age(900), 0);
    }

    #[test]
    fn test_placeholder_edition() {
        let edition = Edition::placeholder("October 16, 2026", None, "No events reported");
        assert_eq!(edition.sections.len(), 1);
        assert_eq!(edition.sections[0].title, "No events reported");
        assert!(edition.sections[0].items.is_empty());
        assert_eq!(edition.record_count(), 0);
    }

    #[test]
    fn test_edition_serialization_skips_missing_published() {
        let edition = Edition {
            date: "October 16, 2026".to_string(),
            published: None,
            sections: vec![],
        };
        let json = serde_json::to_string(&edition).unwrap();
        assert!(!json.contains("published"));

        let dated = Edition {
            published: NaiveDate::from_ymd_opt(2026, 10, 16),
            ..edition
        };
        let json = serde_json::to_string(&dated).unwrap();
        assert!(json.contains("\"published\":\"2026-10-16\""));
    }

    #[test]
    fn test_event_record_null_fields_serialize() {
        let record = EventRecord {
            topic: None,
            subtopic: None,
            description: "Something happened.".to_string(),
            sources: vec![],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"topic\":null"));
        assert!(json.contains("\"sources\":[]"));
    }

    #[test]
    fn test_page_deserialization() {
        let json = r#"{
            "page": "Portal:Current_events",
            "fetched_at": 42,
            "headlines": [{"text": "Headline"}],
            "editions": []
        }"#;
        let page: CurrentEventsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.fetched_at, 42);
        assert_eq!(page.headlines[0].text, "Headline");
    }
}
