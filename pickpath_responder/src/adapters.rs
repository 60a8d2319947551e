// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Pickpath Tree.

use pickpath_tree::{NodeId, Tree};

use crate::types::ParentLookup;

impl ParentLookup<NodeId> for Tree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}
