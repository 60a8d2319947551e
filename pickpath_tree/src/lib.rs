// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pickpath Tree: a Kurbo-native, generational node tree for rendered markup.
//!
//! Pickpath Tree holds the live result of rendering a markup string: a
//! document node, elements (lowercased tag plus attributes in source order),
//! and text. Each node also carries the geometry a layout system computed
//! for it, so the tree can answer "where is this element on screen" and
//! "what is under this point".
//!
//! - Nodes are addressed by [`NodeId`], a generational handle. Removing a
//!   node makes its id (and its subtree's ids) stale; stale ids are answered
//!   with `None` everywhere instead of panicking.
//! - Geometry updates are batched and applied by [`Tree::commit`].
//! - [`Tree::hit_test_point`] finds the innermost pickable node under a
//!   document-space point.
//! - [`Tree::outer_markup`] serializes a node back to markup.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything. Upstream code computes
//! boxes with whatever layout system it uses and writes them in with
//! [`Tree::set_local_bounds`] and [`Tree::set_local_transform`].
//!
//! ## Not a parser
//!
//! Turning markup text into nodes happens behind the [`MarkupRenderer`]
//! trait; this crate ships no implementation.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes and world-space synchronization.
//! - [`NodeKind`] / [`Element`] / [`Attribute`]: what a node is.
//! - [`LocalGeometry`]: per-node bounds, transform, and [`NodeFlags`].
//! - [`QueryFilter`]: restricts hit results (visible/pickable).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod render;
mod serialize;
mod tree;
mod types;
mod util;

pub use render::MarkupRenderer;
pub use tree::{Ancestors, Descendants, Hit, QueryFilter, Tree};
pub use types::{Attribute, Element, LocalGeometry, NodeFlags, NodeId, NodeKind};
