// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection state machine.
//!
//! ```text
//!           Select(n) [derive + rect ok]
//!   Empty ───────────────────────────────▶ Selected { anchor, rect }
//!     ▲                                        │
//!     └── Deselect | Deleted | MarkupReplaced ─┤
//!     └── Scrolled | ZoomChanged  (Drop) ──────┘
//! ```
//!
//! Under [`InvalidationMode::Reproject`], `Scrolled` and `ZoomChanged` keep
//! the selection and recompute its rect from the live node instead.

use pickpath_path::{Path, derive};
use pickpath_tree::{NodeId, Tree};

use crate::geometry::{ContainerGeometry, GeometryTracker, OverlayRect};
use crate::policy::{InvalidationMode, SelectionPolicy};

/// The identifier-plus-path pair a selection holds on to.
///
/// `node` is the node the path resolved to when the anchor was last
/// refreshed. It is a hint for the host; every operation that acts on the
/// selection resolves `path` again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// How to find the selected element again.
    pub path: Path,
    /// Where it was last found.
    pub node: NodeId,
}

/// Current selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Empty,
    /// An element is selected.
    Selected {
        /// The selected element.
        anchor: Anchor,
        /// Its overlay, or `None` while it is not rendered.
        rect: Option<OverlayRect>,
    },
}

/// The variant of a [`SelectionState`], without its data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// [`SelectionState::Empty`].
    Empty,
    /// [`SelectionState::Selected`].
    Selected,
}

impl SelectionState {
    /// Which variant this is.
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Empty => StateKind::Empty,
            Self::Selected { .. } => StateKind::Selected,
        }
    }

    /// The anchor, if something is selected.
    pub fn anchor(&self) -> Option<&Anchor> {
        match self {
            Self::Empty => None,
            Self::Selected { anchor, .. } => Some(anchor),
        }
    }

    /// The selected path.
    pub fn path(&self) -> Option<&Path> {
        self.anchor().map(|a| &a.path)
    }

    /// The overlay rect.
    pub fn rect(&self) -> Option<OverlayRect> {
        match self {
            Self::Empty => None,
            Self::Selected { rect, .. } => *rect,
        }
    }
}

/// Inputs to [`SelectionStore::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A click classified as selecting this node.
    Select(NodeId),
    /// A click on empty space.
    Deselect,
    /// The container scrolled.
    Scrolled,
    /// The render wrapper's zoom changed.
    ZoomChanged,
    /// The rendered markup was replaced.
    MarkupReplaced,
    /// A delete command ran, whether or not it found a node.
    Deleted,
}

/// Everything the reducer reads. Passed in, never stored.
#[derive(Copy, Clone, Debug)]
pub struct Scene<'a> {
    /// The committed tree.
    pub tree: &'a Tree,
    /// The scrollable container.
    pub container: NodeId,
    /// The render wrapper; paths are derived and resolved relative to it.
    pub wrapper: NodeId,
    /// Container placement and scroll.
    pub geometry: &'a ContainerGeometry,
    /// Behavior knobs.
    pub policy: &'a SelectionPolicy,
}

impl<'a> Scene<'a> {
    /// A geometry tracker for this scene.
    pub fn tracker(&self) -> GeometryTracker<'a> {
        GeometryTracker::new(self.tree, self.container, self.geometry)
    }

    /// Resolve `path` under the wrapper, logging failures.
    pub fn resolve(&self, path: &Path) -> Option<NodeId> {
        crate::resolve::locate(self.tree, path, self.wrapper, self.policy.fallback)
    }
}

/// Outcome of one [`SelectionStore::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Variant before the event.
    pub before: StateKind,
    /// Variant after the event.
    pub after: StateKind,
    /// Whether the state changed at all (path, node, or rect).
    pub changed: bool,
}

/// Holds the [`SelectionState`] and applies [`SelectionEvent`]s to it.
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
    state: SelectionState,
}

impl SelectionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply `event` against `scene`.
    pub fn apply(&mut self, event: SelectionEvent, scene: &Scene<'_>) -> Transition {
        let next = match event {
            SelectionEvent::Select(node) => select(node, scene),
            SelectionEvent::Deselect
            | SelectionEvent::MarkupReplaced
            | SelectionEvent::Deleted => SelectionState::Empty,
            SelectionEvent::Scrolled => self.invalidate(scene.policy.on_scroll, scene),
            SelectionEvent::ZoomChanged => self.invalidate(scene.policy.on_zoom, scene),
        };
        let transition = Transition {
            before: self.state.kind(),
            after: next.kind(),
            changed: next != self.state,
        };
        if transition.changed {
            tracing::debug!(
                ?event,
                before = ?transition.before,
                after = ?transition.after,
                path = next.path().map(tracing::field::display),
                "selection transition"
            );
        }
        self.state = next;
        transition
    }

    fn invalidate(&self, mode: InvalidationMode, scene: &Scene<'_>) -> SelectionState {
        let SelectionState::Selected { anchor, .. } = &self.state else {
            return SelectionState::Empty;
        };
        match mode {
            InvalidationMode::Drop => SelectionState::Empty,
            InvalidationMode::Reproject => {
                match scene
                    .tracker()
                    .track(&anchor.path, scene.wrapper, scene.policy.fallback)
                {
                    Some((node, rect)) => SelectionState::Selected {
                        anchor: Anchor {
                            path: anchor.path.clone(),
                            node,
                        },
                        rect,
                    },
                    None => SelectionState::Empty,
                }
            }
        }
    }
}

fn select(node: NodeId, scene: &Scene<'_>) -> SelectionState {
    let Some(path) = derive(scene.tree, node, scene.wrapper) else {
        tracing::debug!(?node, "no path from the render wrapper to the clicked node");
        return SelectionState::Empty;
    };
    let Some(rect) = scene.tracker().rect_of(node) else {
        tracing::debug!(%path, "clicked node is not rendered");
        return SelectionState::Empty;
    };
    SelectionState::Selected {
        anchor: Anchor { path, node },
        rect: Some(rect),
    }
}
