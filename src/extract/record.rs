//! Turning one leaf item into an [`EventRecord`].

use super::dom::{MarkupElement, is_link, leading_element, text_of};
use super::rules::ExtractRules;
use crate::models::{EventRecord, SourceLink};
use scraper::ElementRef;

/// Text of the link `item` opens with, unless that link is a citation.
///
/// Used for the topic of a top-level item and the subtopic of a leaf.
pub fn leading_link_text(item: ElementRef<'_>, rules: &ExtractRules) -> Option<String> {
    let lead = leading_element(item)?;
    if !is_link(lead) || rules.is_citation(lead) {
        return None;
    }
    let text = text_of(lead).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Build the record for `leaf`, which sits below an item whose topic is
/// `inherited_topic`.
///
/// Citations are taken out of a scratch copy of the leaf; the subtopic is
/// read from the leaf itself, which is left as it was.
pub fn extract_record(
    leaf: ElementRef<'_>,
    inherited_topic: Option<&str>,
    rules: &ExtractRules,
) -> EventRecord {
    let mut scratch = MarkupElement::copy_of(leaf, &|el: ElementRef<'_>| rules.is_citation(el));

    let sources = scratch
        .remove_flagged()
        .into_iter()
        .map(|link| SourceLink {
            name: citation_name(&link.text()),
            url: link.find_attr("href").unwrap_or_default().to_string(),
        })
        .collect();

    // Strip first, trim after: "happened (Src)." keeps its space before "."
    let description = scratch.text().trim().to_string();

    EventRecord {
        topic: inherited_topic.map(str::to_string),
        subtopic: leading_link_text(leaf, rules),
        description,
        sources,
    }
}

/// `(Reuters)` → `Reuters`
fn citation_name(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix('(').unwrap_or(text);
    let text = text.strip_suffix(')').unwrap_or(text);
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use scraper::{Html, Selector};

    fn rules() -> ExtractRules {
        ExtractRules::from_config(&Config::default()).unwrap()
    }

    fn record_for(html: &str, topic: Option<&str>) -> EventRecord {
        let doc = Html::parse_fragment(html);
        let leaf = doc
            .select(&Selector::parse("#leaf").unwrap())
            .next()
            .unwrap();
        extract_record(leaf, topic, &rules())
    }

    #[test]
    fn test_citation_is_stripped_from_description() {
        let record = record_for(
            r#"<li id="leaf">Example happened <a class="external text" href="https://x">(Source)</a>.</li>"#,
            None,
        );
        assert_eq!(record.description, "Example happened .");
        assert_eq!(
            record.sources,
            vec![SourceLink {
                name: "Source".to_string(),
                url: "https://x".to_string(),
            }]
        );
        assert_eq!(record.subtopic, None);
        assert_eq!(record.topic, None);
    }

    #[test]
    fn test_multiple_citations_in_order() {
        let record = record_for(
            r#"<li id="leaf">Talks resume. <a class="external text" href="https://r">(Reuters)</a> <a class="external text" href="https://a">(AP)</a></li>"#,
            Some("Diplomacy"),
        );
        let names: Vec<_> = record.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Reuters", "AP"]);
        assert_eq!(record.description, "Talks resume.");
        assert_eq!(record.topic.as_deref(), Some("Diplomacy"));
    }

    #[test]
    fn test_leading_link_becomes_subtopic() {
        let record = record_for(
            r#"<li id="leaf"><a href="/wiki/Flood">Flood</a>: rivers rise. <a class="external text" href="https://b">(BBC)</a></li>"#,
            Some("Disasters"),
        );
        assert_eq!(record.subtopic.as_deref(), Some("Flood"));
        assert_eq!(record.description, "Flood: rivers rise.");
        assert_eq!(record.sources.len(), 1);
    }

    #[test]
    fn test_leading_citation_is_not_a_subtopic() {
        let record = record_for(
            r#"<li id="leaf"><a class="external text" href="https://c">(CNN)</a> Something.</li>"#,
            None,
        );
        assert_eq!(record.subtopic, None);
        assert_eq!(record.description, "Something.");
        assert_eq!(record.sources[0].name, "CNN");
    }

    #[test]
    fn test_no_citation_gives_empty_sources() {
        let record = record_for(r#"<li id="leaf">  Unsourced claim.  </li>"#, None);
        assert!(record.sources.is_empty());
        assert_eq!(record.description, "Unsourced claim.");
    }

    #[test]
    fn test_citation_without_parentheses() {
        let record = record_for(
            r#"<li id="leaf">Text <a class="external" href="https://n">NYT</a></li>"#,
            None,
        );
        assert_eq!(record.sources[0].name, "NYT");
    }

    #[test]
    fn test_citation_name_trims_parentheses() {
        assert_eq!(citation_name("(Al Jazeera)"), "Al Jazeera");
        assert_eq!(citation_name(" (AP "), "AP");
        assert_eq!(citation_name("Reuters)"), "Reuters");
        assert_eq!(citation_name(""), "");
    }

    #[test]
    fn test_leading_link_text_plain_item() {
        let doc = Html::parse_fragment(r#"<li id="leaf">Region X<ul><li>a</li></ul></li>"#);
        let item = doc
            .select(&Selector::parse("#leaf").unwrap())
            .next()
            .unwrap();
        assert_eq!(leading_link_text(item, &rules()), None);
    }
}
