// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click classification for a preview container.
//!
//! The preview is laid out as container (the hit tester's root) → render
//! wrapper → rendered markup. A click is classified as:
//!
//! - ignored, when it lands outside the container or no wrapper exists;
//! - [`Classification::Deselect`], when it lands on the container or the
//!   wrapper itself (empty space);
//! - [`Classification::Select`], otherwise.
//!
//! [`HitTester::deliver_click`] runs the classification as a capture-phase
//! listener on the container, ahead of every listener the rendered markup may
//! have, and stops propagation when the click selects something.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use pickpath_tree::{NodeId, NodeKind, QueryFilter, Tree};

use crate::dispatcher;
use crate::router::Router;
use crate::types::{Dispatch, Outcome, Phase};

/// Class name the preview puts on its render wrapper by default.
pub const DEFAULT_WRAPPER_CLASS: &str = "render-wrapper";

/// What a click means for the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Select this element.
    Select(NodeId),
    /// Clear the selection.
    Deselect,
}

/// Result of [`HitTester::deliver_click`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickDelivery {
    /// The selection listener's verdict, or `None` if it ignored the click
    /// (or never saw it, because the target lies outside the container).
    pub classification: Option<Classification>,
    /// Whether propagation stopped before the sequence completed.
    pub propagation_stopped: bool,
}

/// Classifies pointer targets relative to a preview container.
#[derive(Clone, Debug)]
pub struct HitTester {
    root: NodeId,
    wrapper_class: String,
}

impl HitTester {
    /// Create a hit tester for the container `root`, whose render wrapper is
    /// the first descendant element carrying `wrapper_class`.
    pub fn new(root: NodeId, wrapper_class: impl Into<String>) -> Self {
        Self {
            root,
            wrapper_class: wrapper_class.into(),
        }
    }

    /// The container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The wrapper class name.
    pub fn wrapper_class(&self) -> &str {
        &self.wrapper_class
    }

    /// Find the render wrapper inside the container.
    pub fn wrapper(&self, tree: &Tree) -> Option<NodeId> {
        tree.descendants(self.root).find(|&id| {
            tree.element(id)
                .is_some_and(|e| e.has_class(&self.wrapper_class))
        })
    }

    /// Classify a click whose original target is `target`.
    ///
    /// Text targets count as their parent element.
    pub fn classify(&self, tree: &Tree, target: NodeId) -> Option<Classification> {
        let target = event_target(tree, target)?;
        if !tree.contains(self.root, target) {
            return None;
        }
        let wrapper = self.wrapper(tree)?;
        if target == self.root || target == wrapper {
            return Some(Classification::Deselect);
        }
        Some(Classification::Select(target))
    }

    /// The event target for a click at a document-space point: the innermost
    /// visible, pickable node there, with text retargeted to its element.
    pub fn target_at(&self, tree: &Tree, point: Point) -> Option<NodeId> {
        let hit = tree.hit_test_point(point, QueryFilter::new().visible().pickable())?;
        event_target(tree, hit.node)
    }

    /// Deliver a click to `target`.
    ///
    /// The selection listener sits on the container in the capture phase (or
    /// the target phase when the container is itself the target). Every other
    /// listener, whether it belongs to host chrome or to the rendered markup,
    /// is reached through `handler` in ordinary capture → target → bubble
    /// order. When the click selects an element, propagation stops at the
    /// container and `handler` never sees the markup's entries.
    pub fn deliver_click(
        &self,
        tree: &Tree,
        target: NodeId,
        mut handler: impl FnMut(&Dispatch<NodeId>) -> Outcome,
    ) -> ClickDelivery {
        let Some(target) = event_target(tree, target) else {
            return ClickDelivery::default();
        };
        let seq: Vec<Dispatch<NodeId>> = Router::with_parent(tree).dispatch_for(target);
        let mut delivery = ClickDelivery::default();
        let stopped = dispatcher::run(&seq, &mut delivery, |d, delivery| {
            if d.node == self.root && matches!(d.phase, Phase::Capture | Phase::Target) {
                delivery.classification = self.classify(tree, target);
                if matches!(delivery.classification, Some(Classification::Select(_))) {
                    return Outcome::Stop;
                }
            }
            handler(d)
        });
        delivery.propagation_stopped = stopped.is_some();
        delivery
    }
}

fn event_target(tree: &Tree, target: NodeId) -> Option<NodeId> {
    match tree.kind(target)? {
        NodeKind::Text(_) => tree.parent_of(target),
        NodeKind::Document | NodeKind::Element(_) => Some(target),
    }
}
