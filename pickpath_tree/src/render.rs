// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between markup text and a live tree.

use crate::tree::Tree;
use crate::types::NodeId;

/// Turns markup text into nodes.
///
/// Implementations append the nodes produced from `markup` as children of
/// `parent`, in order. They do not lay anything out: geometry is left at its
/// defaults for the host's layout system to fill in. Sanitization, if any,
/// is the implementation's business.
pub trait MarkupRenderer {
    /// Error reported when the markup cannot be rendered.
    type Error;

    /// Render `markup` under `parent`.
    fn render(&self, markup: &str, tree: &mut Tree, parent: NodeId) -> Result<(), Self::Error>;
}
