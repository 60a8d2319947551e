// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: phases, outcomes, dispatch entries, and parent lookup.

/// Propagation phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Outermost ancestor toward the target's parent.
    Capture,
    /// The target itself.
    Target,
    /// The target's parent back out to the outermost ancestor.
    Bubble,
}

/// Handler outcome, controlling propagation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Stop propagation immediately; no later entries run.
    Stop,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose listeners run in this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase entry.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target-phase entry.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase entry.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Parent lookup used to reconstruct the outermost-to-target path.
pub trait ParentLookup<K> {
    /// Return the parent of `node`, or `None` at the top.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, T: ParentLookup<K> + ?Sized> ParentLookup<K> for &T {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}
