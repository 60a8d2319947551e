// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pickpath Markup: render HTML text into a [`pickpath_tree::Tree`].
//!
//! [`HtmlRenderer`] parses with html5ever the way a browser parses a full
//! document, then mirrors the children of `<body>` under the target node.
//! Element tags are lowercased; attributes keep source order and the case
//! the parser gives them, so SVG's `viewBox` survives. Comments,
//! doctypes, processing instructions, and anything the parser hoisted into
//! `<head>` are dropped. Nothing is laid out: geometry stays at its defaults
//! for the host to fill in.
//!
//! ```rust
//! use pickpath_markup::HtmlRenderer;
//! use pickpath_tree::{Element, MarkupRenderer, Tree};
//!
//! let mut tree = Tree::new();
//! let wrapper = tree.insert_element(tree.document(), Element::new("div")).unwrap();
//! HtmlRenderer::new()
//!     .render("<P class=lead>Hello <b>there</b><!-- note -->", &mut tree, wrapper)
//!     .unwrap();
//! assert_eq!(
//!     tree.inner_markup(wrapper).as_deref(),
//!     Some(r#"<p class="lead">Hello <b>there</b></p>"#)
//! );
//! ```

use std::io;

use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use pickpath_tree::{Element, MarkupRenderer, NodeId, NodeKind, Tree};

/// Errors from [`HtmlRenderer`].
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// The parser's input sink failed.
    #[error("failed to read markup: {0}")]
    Io(#[from] io::Error),
    /// The render target is stale or is a text node.
    #[error("render target {0:?} cannot hold elements")]
    InvalidParent(NodeId),
}

/// Renders HTML with html5ever.
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    scripting_enabled: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    /// A renderer that parses as if scripting were disabled, so `<noscript>`
    /// content is parsed as markup.
    pub fn new() -> Self {
        Self {
            scripting_enabled: false,
        }
    }

    /// Builder-style scripting flag. It only changes how `<noscript>` parses;
    /// scripts are never run.
    #[must_use]
    pub fn with_scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    fn parse(&self, markup: &str) -> Result<RcDom, MarkupError> {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                exact_errors: false,
                scripting_enabled: self.scripting_enabled,
                ..TreeBuilderOpts::default()
            },
            ..ParseOpts::default()
        };
        Ok(parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut markup.as_bytes())?)
    }
}

impl MarkupRenderer for HtmlRenderer {
    type Error = MarkupError;

    fn render(&self, markup: &str, tree: &mut Tree, parent: NodeId) -> Result<(), MarkupError> {
        if !matches!(
            tree.kind(parent),
            Some(NodeKind::Document | NodeKind::Element(_))
        ) {
            return Err(MarkupError::InvalidParent(parent));
        }
        let dom = self.parse(markup)?;
        let Some(body) = find_body(&dom.document) else {
            return Ok(());
        };
        let counts = mirror(&body, tree, parent);
        tracing::debug!(
            bytes = markup.len(),
            elements = counts.elements,
            texts = counts.texts,
            dropped = counts.dropped,
            "rendered markup"
        );
        Ok(())
    }
}

#[derive(Default)]
struct Counts {
    elements: usize,
    texts: usize,
    dropped: usize,
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = child_element(document, "html")?;
    child_element(&html, "body")
}

fn child_element(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

/// Copy the children of `source` under `parent`, depth first, in order.
fn mirror(source: &Handle, tree: &mut Tree, parent: NodeId) -> Counts {
    let mut counts = Counts::default();
    let mut stack: Vec<(Handle, NodeId)> = source
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), parent))
        .collect();
    while let Some((handle, parent)) = stack.pop() {
        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let element = attrs
                    .borrow()
                    .iter()
                    .fold(Element::new(&name.local), |el, attr| {
                        el.with_attribute(&attr.name.local, &attr.value)
                    });
                let Some(id) = tree.insert_element(parent, element) else {
                    counts.dropped += 1;
                    continue;
                };
                counts.elements += 1;
                stack.extend(
                    handle
                        .children
                        .borrow()
                        .iter()
                        .rev()
                        .map(|child| (child.clone(), id)),
                );
            }
            NodeData::Text { contents } => {
                if tree.insert_text(parent, contents.borrow().to_string()).is_some() {
                    counts.texts += 1;
                } else {
                    counts.dropped += 1;
                }
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => counts.dropped += 1,
        }
    }
    counts
}
