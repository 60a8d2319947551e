// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pickpath Path: re-resolvable element paths.
//!
//! A selection in a live preview must survive the preview changing under it.
//! Node ids go stale when their node is removed, so instead of holding on to a
//! node, the selection holds a [`Path`]: the chain of tags, ids, classes, and
//! (when needed) sibling indices leading from a root element down to the
//! node. Every later operation [resolves](resolve) the path again.
//!
//! ```rust
//! use pickpath_path::{derive, resolve};
//! use pickpath_tree::{Element, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert_element(tree.document(), Element::new("main")).unwrap();
//! let list = tree.insert_element(root, Element::new("ul")).unwrap();
//! let _first = tree.insert_element(list, Element::new("li")).unwrap();
//! let second = tree.insert_element(list, Element::new("li")).unwrap();
//!
//! let path = derive(&tree, second, root).unwrap();
//! assert_eq!(path.to_string(), "ul > li:nth-of-type(2)");
//! assert_eq!(resolve(&tree, &path, root), Some(second));
//! ```
//!
//! Resolution has two tiers. The path as written is tried first. If it
//! matches nothing and it carries sibling indices, the indices are stripped
//! and the query runs again; [`FallbackPolicy`] says whether that looser
//! match is accepted.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod path;
mod resolve;
mod selector;

pub use path::{Discriminator, Path, PathSegment};
pub use resolve::{
    FallbackPolicy, Resolution, derive, query, query_all, resolve, resolve_detailed,
    resolve_selector, resolve_with,
};
pub use selector::{SelectorError, escape_ident, parse};
