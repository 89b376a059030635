//! Markup access used by the extractors.
//!
//! Reads go straight through [`scraper::ElementRef`], which is a read-only
//! view of the parsed document. When an extractor needs to strip nodes it
//! works on a [`MarkupElement`], an owned copy of one subtree, so the parsed
//! document is never changed.

use scraper::{ElementRef, Node};

/// Element children of `el`, in document order.
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

/// `ul` / `ol`
pub fn is_list(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "ul" | "ol")
}

pub fn is_item(el: ElementRef<'_>) -> bool {
    el.value().name() == "li"
}

pub fn is_link(el: ElementRef<'_>) -> bool {
    el.value().name() == "a"
}

/// Concatenated text of every text node below `el`.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// The element `el`'s content opens with, if it opens with an element.
///
/// Whitespace-only text and comments are skipped. Returns `None` when the
/// first meaningful child is text.
pub fn leading_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    for child in el.children() {
        match child.value() {
            Node::Text(text) if text.trim().is_empty() => continue,
            Node::Comment(_) => continue,
            Node::Element(_) => return ElementRef::wrap(child),
            _ => return None,
        }
    }
    None
}

/// Owned node of a copied subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element(MarkupElement),
}

/// Owned copy of an element and everything below it.
///
/// `flagged` records whether the predicate passed to [`MarkupElement::copy_of`]
/// matched the source element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub flagged: bool,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    /// Copy `el` and its subtree, flagging every element matching `flag`.
    pub fn copy_of<P>(el: ElementRef<'_>, flag: &P) -> Self
    where
        P: Fn(ElementRef<'_>) -> bool,
    {
        let children = el
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(MarkupNode::Text(text.to_string())),
                Node::Element(_) => {
                    ElementRef::wrap(child).map(|e| MarkupNode::Element(Self::copy_of(e, flag)))
                }
                _ => None,
            })
            .collect();

        Self {
            name: el.value().name().to_string(),
            attrs: el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            flagged: flag(el),
            children,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of every text node below this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Element(el) => el.push_text(out),
            }
        }
    }

    /// First `href`-like attribute on this element or below it.
    pub fn find_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).or_else(|| {
            self.children.iter().find_map(|child| match child {
                MarkupNode::Element(el) => el.find_attr(name),
                MarkupNode::Text(_) => None,
            })
        })
    }

    /// Detach every flagged descendant and return them in document order.
    ///
    /// A flagged element is removed whole; nothing below it is inspected.
    /// The element itself is never removed, even when flagged.
    pub fn remove_flagged(&mut self) -> Vec<MarkupElement> {
        let mut removed = Vec::new();
        self.drain_flagged(&mut removed);
        removed
    }

    fn drain_flagged(&mut self, removed: &mut Vec<MarkupElement>) {
        for child in std::mem::take(&mut self.children) {
            match child {
                MarkupNode::Element(el) if el.flagged => removed.push(el),
                MarkupNode::Element(mut el) => {
                    el.drain_flagged(removed);
                    self.children.push(MarkupNode::Element(el));
                }
                text => self.children.push(text),
            }
        }
    }
}
