// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operations on the selected element.
//!
//! Each one resolves the path again before acting. A path that no longer
//! resolves turns the operation into a no-op that returns `None`.

use pickpath_path::{FallbackPolicy, Path};
use pickpath_tree::{NodeId, Tree};

use crate::geometry::ScrollRequest;
use crate::resolve::locate;
use crate::store::Scene;

/// Remove the element `path` resolves to under `root`, with its subtree.
///
/// Returns the removed id. Running it again with the same path removes
/// nothing unless the fallback policy finds another match.
pub fn delete_selected(
    tree: &mut Tree,
    path: &Path,
    root: NodeId,
    fallback: FallbackPolicy,
) -> Option<NodeId> {
    let node = locate(tree, path, root, fallback)?;
    if !tree.remove(node) {
        return None;
    }
    tracing::debug!(%path, ?node, "removed element");
    Some(node)
}

/// The scroll that brings the element at `path` into view, aligned per policy.
pub fn scroll_into_view(scene: &Scene<'_>, path: &Path) -> Option<ScrollRequest> {
    let node = scene.resolve(path)?;
    scene
        .tracker()
        .scroll_request(node, scene.policy.scroll_align)
}

/// The outer markup of the element at `path`.
pub fn serialize(scene: &Scene<'_>, path: &Path) -> Option<String> {
    let node = scene.resolve(path)?;
    scene.tree.outer_markup(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickpath_path::derive;
    use pickpath_tree::Element;

    #[test]
    fn delete_is_idempotent_for_unique_paths() {
        let mut tree = Tree::new();
        let doc = tree.document();
        let root = tree.insert_element(doc, Element::new("div")).unwrap();
        let target = tree
            .insert_element(root, Element::new("p").with_attribute("id", "x"))
            .unwrap();
        tree.insert_text(target, "gone").unwrap();
        let path = derive(&tree, target, root).unwrap();

        assert_eq!(
            delete_selected(&mut tree, &path, root, FallbackPolicy::Unique),
            Some(target)
        );
        assert!(!tree.is_alive(target));
        assert!(tree.children_of(root).is_empty());
        assert_eq!(
            delete_selected(&mut tree, &path, root, FallbackPolicy::FirstMatch),
            None
        );
    }
}
