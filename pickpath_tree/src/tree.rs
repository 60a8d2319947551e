// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::{string::String, vec, vec::Vec};
use kurbo::{Affine, Point, Rect};

use crate::types::{Element, LocalGeometry, NodeFlags, NodeId, NodeKind};
use crate::util::transform_rect_bbox;

/// A live node tree: one document node plus element and text descendants.
///
/// Geometry changes (bounds, transforms, flags) and structural changes do
/// **not** update world-space data immediately. They are batched and applied
/// when [`Tree::commit`] is called.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use pickpath_tree::{Element, Tree};
///
/// let mut tree = Tree::new();
/// let doc = tree.document();
/// let div = tree.insert_element(doc, Element::new("DIV")).unwrap();
/// tree.set_local_bounds(div, Rect::new(0.0, 0.0, 100.0, 40.0));
///
/// // Changes only take effect after commit.
/// tree.commit();
///
/// assert_eq!(tree.tag_name(div), Some("div"));
/// assert_eq!(tree.world_bounds(div), Some(Rect::new(0.0, 0.0, 100.0, 40.0)));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    document: NodeId,
    dirty: bool,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from the document to the node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required node flags. Only nodes containing all these flags will be included.
    pub required_flags: NodeFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: NodeFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all nodes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only visible nodes.
    pub fn visible(mut self) -> Self {
        self.required_flags |= NodeFlags::VISIBLE;
        self
    }

    /// Filter to only pickable nodes.
    pub fn pickable(mut self) -> Self {
        self.required_flags |= NodeFlags::PICKABLE;
        self
    }

    /// Check if a node's flags satisfy this filter.
    pub fn matches(&self, node_flags: NodeFlags) -> bool {
        node_flags.contains(self.required_flags)
    }
}

#[derive(Clone, Debug, Default)]
struct WorldNode {
    world_transform: Affine,
    world_bounds: Rect,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    local: LocalGeometry,
    world: WorldNode,
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            kind,
            local: LocalGeometry::default(),
            world: WorldNode::default(),
        }
    }
}

impl Tree {
    /// Create a tree containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(1, NodeKind::Document))],
            generations: vec![1],
            free_list: Vec::new(),
            document: NodeId::new(0, 1),
            dirty: true,
        }
    }

    /// The document node. It can never be removed.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Returns true if changes are pending a [`Tree::commit`].
    pub fn needs_commit(&self) -> bool {
        self.dirty
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is stale or is a text node. The new id is
    /// live immediately; world-space data is computed on the next commit.
    pub fn insert(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        if matches!(self.kind(parent)?, NodeKind::Text(_)) {
            return None;
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
        self.dirty = true;
        Some(id)
    }

    /// Append an element under `parent`.
    pub fn insert_element(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        self.insert(parent, NodeKind::Element(element))
    }

    /// Append a text node under `parent`.
    pub fn insert_text(&mut self, parent: NodeId, text: impl Into<String>) -> Option<NodeId> {
        self.insert(parent, NodeKind::Text(text.into()))
    }

    /// Detach a node from its parent and free it together with its subtree.
    ///
    /// Every id in the subtree becomes stale immediately. Returns false if
    /// `id` is stale or is the document.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) || id == self.document {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes[cur.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(cur.idx());
            }
        }
        self.dirty = true;
        true
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children_of(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// What the node is, or `None` for stale identifiers.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node_opt(id).map(|n| &n.kind)
    }

    /// Element data for a live element node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.kind(id).and_then(NodeKind::as_element)
    }

    /// Mutable element data for a live element node.
    ///
    /// Attribute changes do not affect geometry and do not require a commit.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_opt_mut(id)?.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The lowercased tag name of a live element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    /// Returns the parent of a node if live, or `None` for the document or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Iterate the element children of a node, in order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
    }

    /// Iterate the ancestors of a node, nearest first, ending with the document.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// Returns true if `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Iterate the strict descendants of `root` in document (depth-first, pre-) order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.children_of(root).first().copied(),
        }
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        self.next_in_subtree(current, self.document)
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.local_bounds != bounds
        {
            n.local.local_bounds = bounds;
            self.dirty = true;
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.local_transform != tf
        {
            n.local.local_transform = tf;
            self.dirty = true;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.flags != flags
        {
            n.local.flags = flags;
            self.dirty = true;
        }
    }

    /// Local geometry of a live node.
    pub fn local_geometry(&self, id: NodeId) -> Option<&LocalGeometry> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Return the world transform for a live node as of the last [`Tree::commit`].
    ///
    /// The returned [`Affine`] maps the node's local space into document space.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world.world_transform)
    }

    /// Return the world-space axis-aligned bounding box for a live node as of
    /// the last [`Tree::commit`].
    ///
    /// Under a uniform scale this is exact; under rotation it is loose.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world.world_bounds)
    }

    /// Recompute world transforms and bounds for every node reachable from the document.
    pub fn commit(&mut self) {
        if !self.dirty {
            return;
        }
        // Walk depth-first, propagating transforms toward the leaves.
        let mut stack = vec![(self.document, Affine::IDENTITY)];
        while let Some((id, parent_tf)) = stack.pop() {
            let node = self.node_mut(id);
            node.world.world_transform = parent_tf * node.local.local_transform;
            node.world.world_bounds =
                transform_rect_bbox(node.world.world_transform, node.local.local_bounds);
            let tf = node.world.world_transform;
            for &child in node.children.iter().rev() {
                stack.push((child, tf));
            }
        }
        self.dirty = false;
    }

    /// Hit test a document-space point and return the innermost node under it.
    ///
    /// - Nodes must satisfy the [`QueryFilter`] and contain the point within
    ///   their transformed local bounds.
    /// - Among candidates, deeper nodes win; if depth ties, the newer
    ///   [`NodeId`] wins.
    ///
    /// Results reflect geometry as of the last [`Tree::commit`].
    pub fn hit_test_point(&self, point: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best: Option<(NodeId, usize)> = None;
        for id in self.descendants(self.document) {
            let node = self.node(id);
            if !filter.matches(node.local.flags) {
                continue;
            }
            let local_point = node.world.world_transform.inverse() * point;
            if !node.local.local_bounds.contains(local_point) {
                continue;
            }
            let depth = self.ancestors(id).count();
            match best {
                Some((best_id, best_depth))
                    if depth < best_depth
                        || (depth == best_depth && !id.is_newer_than(best_id)) => {}
                _ => best = Some((id, depth)),
            }
        }
        best.map(|(node, _)| {
            let mut path: Vec<NodeId> = self.ancestors(node).collect();
            path.reverse();
            path.push(node);
            Hit { node, path }
        })
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Next node in pre-order that stays inside `root`'s subtree.
    fn next_in_subtree(&self, current: NodeId, root: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while node != root {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = self.parent_of(node)?;
        }
        None
    }
}

/// Iterator over a node's ancestors, see [`Tree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.parent_of(cur);
        Some(cur)
    }
}

/// Pre-order iterator over a subtree, see [`Tree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.next_in_subtree(cur, self.root);
        Some(cur)
    }
}
