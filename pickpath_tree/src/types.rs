// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the node tree: identifiers, flags, element data, and local geometry.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::{Affine, Rect};
use smallvec::SmallVec;

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` never keeps its node alive. Once the node is removed it goes
/// stale, and every [`Tree`](crate::Tree) accessor treats it as absent, even
/// after the slot has been reused by a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns true if `self` was allocated after `other`.
    pub(crate) fn is_newer_than(self, other: Self) -> bool {
        (self.1 > other.1) || (self.1 == other.1 && self.0 > other.0)
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (rendered, and eligible for a highlight overlay).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// A single element attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, in the case it was first set with.
    pub name: String,
    /// Raw attribute value.
    pub value: String,
}

/// Element data: a lowercased tag name plus attributes in source order.
///
/// Attribute names keep their case (SVG has `viewBox`) but are looked up
/// case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: SmallVec<[Attribute; 4]>,
}

impl Element {
    /// Create an element with no attributes. The tag name is lowercased.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: SmallVec::new(),
        }
    }

    /// Builder-style [`Element::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// The lowercased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All attributes, in the order they were first set.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute value by (case-insensitive) name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute. An existing attribute keeps its position and gets the new value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            existing.value = value.into();
            return;
        }
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(pos).value)
    }

    /// The `id` attribute, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    /// The class list: whitespace-separated tokens of `class`, de-duplicated, in order.
    pub fn class_list(&self) -> Vec<&str> {
        let Some(raw) = self.attribute("class") else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        raw.split_ascii_whitespace()
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Returns true if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|raw| raw.split_ascii_whitespace().any(|c| c == class))
    }

    /// Raw inline style text (the `style` attribute).
    pub fn inline_style(&self) -> Option<&str> {
        self.attribute("style")
    }
}

/// What a node is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. Every tree has exactly one, created by [`Tree::new`](crate::Tree::new).
    Document,
    /// An element.
    Element(Element),
    /// A run of text.
    Text(String),
}

impl NodeKind {
    /// Returns the element data if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the text if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Element> for NodeKind {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

/// Local geometry for a node, written by whatever layout system the host uses.
#[derive(Clone, Debug)]
pub struct LocalGeometry {
    /// Local (untransformed) bounds.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Default for LocalGeometry {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            flags: NodeFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn tag_is_lowercased_and_attribute_names_keep_case() {
        let e = Element::new("BUTTON").with_attribute("ID", "cta");
        assert_eq!(e.tag(), "button");
        assert_eq!(e.attributes()[0].name, "ID");
        assert_eq!(e.attribute("Id"), Some("cta"));
        assert_eq!(e.id(), Some("cta"));

        let mut svg = Element::new("svg").with_attribute("viewBox", "0 0 8 8");
        svg.set_attribute("viewbox", "0 0 4 4");
        assert_eq!(svg.attributes().len(), 1);
        assert_eq!(svg.attributes()[0].name, "viewBox");
        assert_eq!(svg.attribute("viewbox"), Some("0 0 4 4"));
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut e = Element::new("div")
            .with_attribute("class", "a")
            .with_attribute("style", "color:red");
        e.set_attribute("class", "b");
        let names: Vec<&str> = e.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["class", "style"]);
        assert_eq!(e.attribute("class"), Some("b"));
        assert_eq!(e.remove_attribute("class").as_deref(), Some("b"));
        assert_eq!(e.attribute("class"), None);
    }

    #[test]
    fn class_list_is_an_ordered_set() {
        let e = Element::new("div").with_attribute("class", "  card  big card\tred ");
        assert_eq!(e.class_list(), vec!["card", "big", "red"]);
        assert!(e.has_class("big"));
        assert!(!e.has_class("bi"));
    }

    #[test]
    fn empty_id_is_absent() {
        let e = Element::new("div").with_attribute("id", "");
        assert_eq!(e.id(), None);
        assert!(Element::new("div").class_list().is_empty());
    }
}
