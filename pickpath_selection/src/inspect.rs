// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read model for the inspector panel.

use pickpath_path::Path;
use pickpath_tree::{NodeId, NodeKind, Tree};
use serde::Serialize;

use crate::store::Scene;

/// What the inspector shows about the selected element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElementInfo {
    /// Lowercased tag name.
    pub tag: String,
    /// The `id` attribute, if set and non-empty.
    pub id: Option<String>,
    /// Class list, in order, without duplicates.
    pub classes: Vec<String>,
    /// Raw `style` attribute text.
    pub inline_style: Option<String>,
    /// Rendered text with whitespace runs collapsed, cut to the preview length.
    /// Script, style, and template contents below the element are left out.
    pub text: String,
}

impl ElementInfo {
    /// Read the info for a live element; `None` for text, the document, or stale ids.
    pub fn from_node(tree: &Tree, node: NodeId, preview_chars: usize) -> Option<Self> {
        let element = tree.element(node)?;
        let text = rendered_text(tree, node);
        Some(Self {
            tag: element.tag().into(),
            id: element.id().map(Into::into),
            classes: element.class_list().into_iter().map(Into::into).collect(),
            inline_style: element.inline_style().map(Into::into),
            text: preview(&text, preview_chars),
        })
    }
}

/// Elements whose text is never shown on the page.
const UNRENDERED: [&str; 3] = ["script", "style", "template"];

fn rendered_text(tree: &Tree, node: NodeId) -> String {
    let mut out = String::new();
    for d in tree.descendants(node) {
        if let Some(NodeKind::Text(t)) = tree.kind(d)
            && !inside_unrendered(tree, d, node)
        {
            out.push_str(t);
        }
    }
    out
}

/// Whether an element strictly between `node` and `top` hides its text.
fn inside_unrendered(tree: &Tree, node: NodeId, top: NodeId) -> bool {
    let mut cur = node;
    while let Some(parent) = tree.parent_of(cur) {
        if parent == top {
            return false;
        }
        if tree.tag_name(parent).is_some_and(|t| UNRENDERED.contains(&t)) {
            return true;
        }
        cur = parent;
    }
    false
}

/// Collapse whitespace runs to single spaces, trim, and keep at most `max_chars` chars.
fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}

/// Inspect the element at `path`, with the policy's text preview length.
pub fn inspect(scene: &Scene<'_>, path: &Path) -> Option<ElementInfo> {
    let node = scene.resolve(path)?;
    ElementInfo::from_node(scene.tree, node, scene.policy.text_preview_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickpath_tree::Element;

    #[test]
    fn reads_attributes_and_text() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let el = tree
            .insert_element(
                doc,
                Element::new("BUTTON")
                    .with_attribute("id", "cta")
                    .with_attribute("class", "btn  btn primary")
                    .with_attribute("style", "padding:8px 12px"),
            )
            .unwrap();
        tree.insert_text(el, "  Click\n   me ").unwrap();
        let info = ElementInfo::from_node(&tree, el, 200).unwrap();
        assert_eq!(
            info,
            ElementInfo {
                tag: "button".into(),
                id: Some("cta".into()),
                classes: vec!["btn".into(), "primary".into()],
                inline_style: Some("padding:8px 12px".into()),
                text: "Click me".into(),
            }
        );
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        assert_eq!(preview("héllo wörld", 7), "héllo w");
        assert_eq!(preview("abc", 0), "");
        assert_eq!(preview("  a \t b  ", 10), "a b");
        let long = "x".repeat(500);
        assert_eq!(preview(&long, 200).chars().count(), 200);
    }

    #[test]
    fn script_and_style_text_is_left_out() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let card = tree.insert_element(doc, Element::new("div")).unwrap();
        let style = tree.insert_element(card, Element::new("style")).unwrap();
        tree.insert_text(style, ".x { color: red }").unwrap();
        let p = tree.insert_element(card, Element::new("p")).unwrap();
        tree.insert_text(p, "Visible").unwrap();
        let script = tree.insert_element(p, Element::new("script")).unwrap();
        tree.insert_text(script, "alert(1)").unwrap();
        tree.insert_text(card, " text").unwrap();

        let info = ElementInfo::from_node(&tree, card, 200).unwrap();
        assert_eq!(info.text, "Visible text");
        // Selecting the style element itself still shows its source.
        let info = ElementInfo::from_node(&tree, style, 200).unwrap();
        assert_eq!(info.text, ".x { color: red }");
    }

    #[test]
    fn text_nodes_have_no_info() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let text = tree.insert_text(doc, "hi").unwrap();
        assert_eq!(ElementInfo::from_node(&tree, text, 200), None);
        assert_eq!(ElementInfo::from_node(&tree, doc, 200), None);
    }
}
