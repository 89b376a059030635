//! Records of one topical list.

use super::dom::{child_elements, is_item};
use super::leaves::collect_leaves;
use super::record::{extract_record, leading_link_text};
use super::rules::ExtractRules;
use crate::models::EventRecord;
use scraper::ElementRef;
use tracing::trace;

/// Parse the list `list_root` into records, in document order.
///
/// Each top-level item decides its topic once from its own leading link;
/// every leaf below it inherits that topic unchanged.
pub fn parse_section(list_root: ElementRef<'_>, rules: &ExtractRules) -> Vec<EventRecord> {
    let mut records = Vec::new();

    for item in child_elements(list_root).filter(|c| is_item(*c)) {
        let topic = leading_link_text(item, rules);
        for leaf in collect_leaves(item) {
            let record = extract_record(leaf, topic.as_deref(), rules);
            if rules.skip_empty_leaves && is_empty(&record) {
                trace!(topic = ?record.topic, "Skipping empty leaf");
                continue;
            }
            records.push(record);
        }
    }

    records
}

fn is_empty(record: &EventRecord) -> bool {
    record.description.is_empty() && record.sources.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use scraper::{Html, Selector};

    fn parse(html: &str, config: &Config) -> Vec<EventRecord> {
        let rules = ExtractRules::from_config(config).unwrap();
        let doc = Html::parse_fragment(html);
        let root = doc
            .select(&Selector::parse("#root").unwrap())
            .next()
            .unwrap();
        parse_section(root, &rules)
    }

    const NESTED: &str = r#"<ul id="root"><li><a href="/wiki/Sports">Sports</a><ul><li>Cup final held. <a class="external text" href="https://s">(ESPN)</a></li><li><a href="/wiki/Tennis">Tennis</a><ul><li>Upset in round one.</li></ul></li></ul></li></ul>"#;

    #[test]
    fn test_topic_is_inherited_by_every_leaf() {
        let records = parse(NESTED, &Config::default());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.topic.as_deref() == Some("Sports")));
        // "Tennis" is a branch, so the leaf below it has no subtopic
        assert_eq!(records[1].subtopic, None);
        assert_eq!(records[1].description, "Upset in round one.");
    }

    #[test]
    fn test_plain_text_item_gives_null_topic() {
        let plain = NESTED.replace(r#"<a href="/wiki/Sports">Sports</a>"#, "Sports");
        let records = parse(&plain, &Config::default());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.topic.is_none()));
    }

    #[test]
    fn test_items_keep_document_order() {
        let html = r#"<ul id="root"><li><a href="/a">A</a><ul><li>a1</li><li>a2</li></ul></li><li><a href="/b">B</a><ul><li>b1</li></ul></li></ul>"#;
        let records = parse(html, &Config::default());
        let got: Vec<_> = records
            .iter()
            .map(|r| (r.topic.as_deref().unwrap(), r.description.as_str()))
            .collect();
        assert_eq!(got, vec![("A", "a1"), ("A", "a2"), ("B", "b1")]);
    }

    #[test]
    fn test_empty_leaves_kept_by_default() {
        let html = r#"<ul id="root"><li><a href="/a">A</a><ul><li> </li><li>real</li></ul></li></ul>"#;
        assert_eq!(parse(html, &Config::default()).len(), 2);

        let skipping = Config {
            skip_empty_leaves: true,
            ..Config::default()
        };
        let records = parse(html, &skipping);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "real");
    }

    #[test]
    fn test_top_level_leaf_item() {
        let html = r#"<ul id="root"><li><a href="/wiki/Quake">Quake</a> strikes coast. <a class="external text" href="https://q">(USGS)</a></li></ul>"#;
        let records = parse(html, &Config::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic.as_deref(), Some("Quake"));
        assert_eq!(records[0].subtopic.as_deref(), Some("Quake"));
        assert_eq!(records[0].description, "Quake strikes coast.");
    }
}
