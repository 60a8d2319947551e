// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deriving a [`Path`] from a live node, and resolving one back.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

use pickpath_tree::{Element, NodeId, Tree};

use crate::path::{Discriminator, Path, PathSegment};
use crate::selector::SelectorError;

/// What to do when the exact path matches nothing.
///
/// Resolution always tries the path as written first. If that fails and the
/// path carries sibling indices, a second query runs with every index
/// stripped; this policy decides what that second query may return.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FallbackPolicy {
    /// No fallback: only the exact path counts.
    Strict,
    /// Accept the stripped query only if it matches exactly one node.
    #[default]
    Unique,
    /// Accept the first match of the stripped query in document order.
    FirstMatch,
}

/// Outcome of [`resolve_detailed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The path as written matched this node.
    Exact(NodeId),
    /// Only the index-stripped path matched, and the policy accepted this node.
    Fallback(NodeId),
    /// Nothing acceptable matched.
    NotFound,
    /// The path's selector text could not be parsed back.
    Malformed(SelectorError),
}

impl Resolution {
    /// The resolved node, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Exact(id) | Self::Fallback(id) => Some(*id),
            Self::NotFound | Self::Malformed(_) => None,
        }
    }
}

/// Derive the path from `root` down to the element `node`.
///
/// Returns `None` if `node` is not an element strictly inside `root`, or if
/// either id is stale. Each segment uses the element's id when it has one,
/// otherwise its class list, otherwise the tag alone; a sibling index is
/// added only when that would match more than one same-tag sibling.
pub fn derive(tree: &Tree, node: NodeId, root: NodeId) -> Option<Path> {
    if node == root || !tree.is_alive(root) {
        return None;
    }
    tree.element(node)?;
    let mut segments = Vec::new();
    let mut cur = node;
    while cur != root {
        // Reaching the document first means `node` lies outside `root`.
        let element = tree.element(cur)?;
        let parent = tree.parent_of(cur)?;
        segments.push(segment_for(tree, cur, element, parent));
        cur = parent;
    }
    segments.reverse();
    Some(Path::new(segments))
}

/// Selector text has no way to spell NUL; such values cannot discriminate.
fn expressible(value: &str) -> bool {
    !value.contains('\0')
}

fn segment_for(tree: &Tree, node: NodeId, element: &Element, parent: NodeId) -> PathSegment {
    let discriminator = if let Some(id) = element.id().filter(|id| expressible(id)) {
        Discriminator::Id(id.into())
    } else {
        let classes: Vec<_> = element
            .class_list()
            .into_iter()
            .filter(|c| expressible(c))
            .collect();
        if classes.is_empty() {
            Discriminator::None
        } else {
            Discriminator::Classes(classes.into_iter().map(Into::into).collect())
        }
    };
    let mut segment = PathSegment {
        tag: element.tag().into(),
        discriminator,
        nth_of_type: None,
    };
    let rivals = tree
        .element_children(parent)
        .filter(|&sibling| matches_ignoring_index(tree, sibling, &segment))
        .count();
    if rivals > 1 {
        segment.nth_of_type = nth_of_type(tree, node);
    }
    segment
}

/// 1-based position of `node` among its same-tag element siblings.
fn nth_of_type(tree: &Tree, node: NodeId) -> Option<NonZeroUsize> {
    let tag = tree.tag_name(node)?;
    let parent = tree.parent_of(node)?;
    let mut n = 0;
    for sibling in tree.element_children(parent) {
        if tree.tag_name(sibling) == Some(tag) {
            n += 1;
        }
        if sibling == node {
            return NonZeroUsize::new(n);
        }
    }
    None
}

fn matches_ignoring_index(tree: &Tree, node: NodeId, segment: &PathSegment) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    if !element.tag().eq_ignore_ascii_case(&segment.tag) {
        return false;
    }
    match &segment.discriminator {
        Discriminator::None => true,
        Discriminator::Id(id) => element.id() == Some(id.as_str()),
        Discriminator::Classes(classes) => classes.iter().all(|c| element.has_class(c)),
    }
}

fn matches(tree: &Tree, node: NodeId, segment: &PathSegment) -> bool {
    matches_ignoring_index(tree, node, segment)
        && segment
            .nth_of_type
            .is_none_or(|n| nth_of_type(tree, node) == Some(n))
}

/// All elements under `root` matched by `path`, in document order.
///
/// Matching is anchored: the first segment is matched against the element
/// children of `root`, each later segment against the children of the
/// previous matches.
pub fn query_all(tree: &Tree, path: &Path, root: NodeId) -> Vec<NodeId> {
    if path.is_empty() || !tree.is_alive(root) {
        return Vec::new();
    }
    let mut frontier = alloc::vec![root];
    for segment in path.segments() {
        frontier = frontier
            .iter()
            .flat_map(|&parent| tree.element_children(parent))
            .filter(|&child| matches(tree, child, segment))
            .collect();
        if frontier.is_empty() {
            break;
        }
    }
    frontier
}

/// The first element under `root` matched by `path`, in document order.
pub fn query(tree: &Tree, path: &Path, root: NodeId) -> Option<NodeId> {
    query_all(tree, path, root).into_iter().next()
}

/// Resolve `path` under `root`, reporting which tier matched.
///
/// The path is printed to selector text and parsed back before querying, so
/// a path that cannot be expressed as text resolves to
/// [`Resolution::Malformed`] rather than to a node.
pub fn resolve_detailed(
    tree: &Tree,
    path: &Path,
    root: NodeId,
    policy: FallbackPolicy,
) -> Resolution {
    let text = path.to_string();
    match text.parse::<Path>() {
        Ok(parsed) => resolve_parsed(tree, &parsed, root, policy),
        Err(err) => Resolution::Malformed(err),
    }
}

/// Resolve selector text under `root`.
pub fn resolve_selector(
    tree: &Tree,
    selector: &str,
    root: NodeId,
    policy: FallbackPolicy,
) -> Resolution {
    match selector.parse::<Path>() {
        Ok(parsed) => resolve_parsed(tree, &parsed, root, policy),
        Err(err) => Resolution::Malformed(err),
    }
}

fn resolve_parsed(tree: &Tree, path: &Path, root: NodeId, policy: FallbackPolicy) -> Resolution {
    if let Some(node) = query(tree, path, root) {
        return Resolution::Exact(node);
    }
    if policy == FallbackPolicy::Strict || !path.has_sibling_indices() {
        return Resolution::NotFound;
    }
    let candidates = query_all(tree, &path.without_sibling_indices(), root);
    let accepted = match (policy, candidates.as_slice()) {
        (FallbackPolicy::Unique, [only]) => Some(*only),
        (FallbackPolicy::FirstMatch, [first, ..]) => Some(*first),
        _ => None,
    };
    accepted.map_or(Resolution::NotFound, Resolution::Fallback)
}

/// Resolve `path` under `root` with `policy`.
pub fn resolve_with(
    tree: &Tree,
    path: &Path,
    root: NodeId,
    policy: FallbackPolicy,
) -> Option<NodeId> {
    resolve_detailed(tree, path, root, policy).node()
}

/// Resolve `path` under `root` with the default [`FallbackPolicy`].
pub fn resolve(tree: &Tree, path: &Path, root: NodeId) -> Option<NodeId> {
    resolve_with(tree, path, root, FallbackPolicy::default())
}
