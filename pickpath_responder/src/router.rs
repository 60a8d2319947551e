// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router: turns a target into a capture → target → bubble sequence.
//!
//! The path is reconstructed through a [`ParentLookup`], outermost first.
//! Capture visits every ancestor from the outermost down to the target's
//! parent, then the target, then bubble visits the ancestors in reverse.

use alloc::vec::Vec;

use crate::types::{Dispatch, ParentLookup};

/// Deterministic responder chain router.
pub struct Router<K, P: ParentLookup<K>> {
    parent: P,
    _phantom: core::marker::PhantomData<fn() -> K>,
}

impl<K, P: ParentLookup<K>> core::fmt::Debug for Router<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl<K: Copy, P: ParentLookup<K>> Router<K, P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self {
            parent,
            _phantom: core::marker::PhantomData,
        }
    }

    /// Emit the propagation sequence for `target`.
    pub fn dispatch_for(&self, target: K) -> Vec<Dispatch<K>> {
        emit_path(&self.reconstruct_path(target))
    }

    fn reconstruct_path(&self, target: K) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = target;
        // Collect to root; caller ensures acyclic ancestry.
        loop {
            out.push(cur);
            match self.parent.parent_of(&cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}

/// Emit a capture → target → bubble sequence for an outermost-first path.
fn emit_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let mut out = Vec::with_capacity(path.len() * 2);
    let Some((&target, ancestors)) = path.split_last() else {
        return out;
    };
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
    out.push(Dispatch::target(target));
    out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    fn phases(seq: &[Dispatch<Node>]) -> Vec<(Phase, u32)> {
        seq.iter().map(|d| (d.phase, d.node.0)).collect()
    }

    #[test]
    fn reconstructs_path_through_parents() {
        let router = Router::with_parent(Parents);
        let out = router.dispatch_for(Node(3));
        assert_eq!(
            phases(&out),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn a_root_target_is_a_singleton() {
        let router = Router::with_parent(Parents);
        let out = router.dispatch_for(Node(5));
        assert_eq!(phases(&out), vec![(Phase::Target, 5)]);
    }

    #[test]
    fn empty_path_emits_nothing() {
        assert!(emit_path::<Node>(&[]).is_empty());
    }
}
