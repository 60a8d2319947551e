// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path resolution with logging at the selection boundary.

use pickpath_path::{FallbackPolicy, Path, Resolution, resolve_detailed};
use pickpath_tree::{NodeId, Tree};

/// Resolve `path` under `root`, logging why it failed if it did.
///
/// Selector syntax failures are logged at `warn` and otherwise treated like
/// any other miss.
pub(crate) fn locate(
    tree: &Tree,
    path: &Path,
    root: NodeId,
    fallback: FallbackPolicy,
) -> Option<NodeId> {
    match resolve_detailed(tree, path, root, fallback) {
        Resolution::Exact(node) => Some(node),
        Resolution::Fallback(node) => {
            tracing::debug!(%path, ?fallback, "path resolved by stripping sibling indices");
            Some(node)
        }
        Resolution::NotFound => {
            tracing::debug!(%path, "path no longer resolves");
            None
        }
        Resolution::Malformed(err) => {
            tracing::warn!(%path, %err, "selector text rejected");
            None
        }
    }
}
