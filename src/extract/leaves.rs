//! Leaf discovery in nested list trees.
//!
//! An item is a branch when it has a list as a direct child, otherwise it is
//! a leaf. Branches are replaced by the leaves found under each item of each
//! of their nested lists, depth first, in document order.

use super::dom::{child_elements, is_item, is_list};
use scraper::ElementRef;

/// Collect every leaf at or below `node`, in document order.
///
/// A list node stands for its items. Any other node without a nested list
/// is returned as the only leaf, even when it has no text. A nested list
/// without items contributes nothing.
pub fn collect_leaves<'a>(node: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut leaves = Vec::new();
    push_leaves(node, &mut leaves);
    leaves
}

fn push_leaves<'a>(node: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    if is_list(node) {
        for item in child_elements(node).filter(|c| is_item(*c)) {
            push_leaves(item, out);
        }
        return;
    }
    let mut lists = child_elements(node).filter(|c| is_list(*c)).peekable();
    if lists.peek().is_none() {
        out.push(node);
        return;
    }
    for list in lists {
        for item in child_elements(list).filter(|c| is_item(*c)) {
            push_leaves(item, out);
        }
    }
}
