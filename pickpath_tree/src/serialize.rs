// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup serialization and text extraction.

use alloc::string::String;
use core::fmt::Write as _;

use crate::tree::Tree;
use crate::types::{NodeId, NodeKind};
use crate::util::{is_raw_text_element, is_void_element};

impl Tree {
    /// Serialize a node including itself ("outer" markup).
    ///
    /// Returns `None` for stale identifiers. The document serializes to its
    /// children's markup.
    ///
    /// ```rust
    /// use pickpath_tree::{Element, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let doc = tree.document();
    /// let button = tree
    ///     .insert_element(doc, Element::new("button").with_attribute("id", "cta"))
    ///     .unwrap();
    /// tree.insert_text(button, "Click");
    /// assert_eq!(
    ///     tree.outer_markup(button).as_deref(),
    ///     Some(r#"<button id="cta">Click</button>"#)
    /// );
    /// ```
    pub fn outer_markup(&self, id: NodeId) -> Option<String> {
        let mut out = String::new();
        self.write_node(id, false, &mut out)?;
        Some(out)
    }

    /// Serialize only the children of a node ("inner" markup).
    pub fn inner_markup(&self, id: NodeId) -> Option<String> {
        let raw = self.tag_name(id).is_some_and(is_raw_text_element);
        let mut out = String::new();
        self.kind(id)?;
        for &child in self.children_of(id) {
            self.write_node(child, raw, &mut out)?;
        }
        Some(out)
    }

    /// Concatenated text of a node and its descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let mut out = String::new();
        if let NodeKind::Text(t) = self.kind(id)? {
            out.push_str(t);
            return Some(out);
        }
        for d in self.descendants(id) {
            if let Some(NodeKind::Text(t)) = self.kind(d) {
                out.push_str(t);
            }
        }
        Some(out)
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) -> Option<()> {
        match self.kind(id)? {
            NodeKind::Document => {
                for &child in self.children_of(id) {
                    self.write_node(child, false, out)?;
                }
            }
            NodeKind::Text(t) if raw_text => out.push_str(t),
            NodeKind::Text(t) => escape_text(t, out),
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(e.tag());
                for attr in e.attributes() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute(&attr.value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(e.tag()) {
                    return Some(());
                }
                let raw = is_raw_text_element(e.tag());
                for &child in self.children_of(id) {
                    self.write_node(child, raw, out)?;
                }
                let _ = write!(out, "</{}>", e.tag());
            }
        }
        Some(())
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Element, Tree};

    #[test]
    fn nested_elements_and_attributes() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let div = tree
            .insert_element(
                doc,
                Element::new("div").with_attribute("style", "padding:24px; color:#0f172a"),
            )
            .unwrap();
        let h1 = tree.insert_element(div, Element::new("H1")).unwrap();
        tree.insert_text(h1, "Hello");
        tree.insert_element(div, Element::new("br"));
        let p = tree.insert_element(div, Element::new("p")).unwrap();
        tree.insert_text(p, "a < b & c");

        assert_eq!(
            tree.outer_markup(div).unwrap(),
            "<div style=\"padding:24px; color:#0f172a\"><h1>Hello</h1><br><p>a &lt; b &amp; c</p></div>"
        );
        assert_eq!(
            tree.inner_markup(div).unwrap(),
            "<h1>Hello</h1><br><p>a &lt; b &amp; c</p>"
        );
        assert_eq!(tree.text_content(div).unwrap(), "Helloa < b & c");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let a = tree
            .insert_element(doc, Element::new("a").with_attribute("title", "say \"hi\" & go"))
            .unwrap();
        assert_eq!(
            tree.outer_markup(a).unwrap(),
            "<a title=\"say &quot;hi&quot; &amp; go\"></a>"
        );
    }

    #[test]
    fn style_text_is_not_escaped() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let style = tree.insert_element(doc, Element::new("style")).unwrap();
        tree.insert_text(style, "a > b { color: red }");
        assert_eq!(
            tree.outer_markup(style).unwrap(),
            "<style>a > b { color: red }</style>"
        );
    }

    #[test]
    fn legacy_void_elements_have_no_end_tag() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let object = tree.insert_element(doc, Element::new("object")).unwrap();
        for tag in ["param", "keygen", "frame"] {
            tree.insert_element(object, Element::new(tag));
        }
        assert_eq!(
            tree.inner_markup(object).unwrap(),
            "<param><keygen><frame>"
        );
    }

    #[test]
    fn attribute_names_keep_their_case() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let svg = tree
            .insert_element(doc, Element::new("svg").with_attribute("viewBox", "0 0 8 8"))
            .unwrap();
        assert_eq!(
            tree.outer_markup(svg).unwrap(),
            "<svg viewBox=\"0 0 8 8\"></svg>"
        );
    }

    #[test]
    fn stale_nodes_serialize_to_none() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let p = tree.insert_element(doc, Element::new("p")).unwrap();
        tree.remove(p);
        assert_eq!(tree.outer_markup(p), None);
        assert_eq!(tree.text_content(p), None);
    }
}
