// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pickpath Responder: capture-phase click routing for a markup preview.
//!
//! ## Overview
//!
//! A preview that renders untrusted markup has to see every click before the
//! markup does. Otherwise a `<button>` in the markup could swallow the click
//! that was meant to select it. This crate provides:
//!
//! - a [`Router`](router::Router) that turns a target into a
//!   capture → target → bubble sequence, reconstructing the path with a
//!   [`ParentLookup`](types::ParentLookup) (implemented for
//!   [`pickpath_tree::Tree`]);
//! - [`dispatcher::run`], which walks such a sequence and honors
//!   [`Outcome::Stop`](types::Outcome::Stop);
//! - [`HitTester`], which classifies a click as select, deselect, or
//!   ignore, and delivers it with the selection listener installed in the
//!   capture phase of the preview container.
//!
//! ## Example
//!
//! ```
//! use pickpath_responder::HitTester;
//! use pickpath_responder::types::Outcome;
//! use pickpath_tree::{Element, Tree};
//!
//! let mut tree = Tree::new();
//! let container = tree.insert_element(tree.document(), Element::new("main")).unwrap();
//! let wrapper = tree
//!     .insert_element(container, Element::new("div").with_attribute("class", "render-wrapper"))
//!     .unwrap();
//! let button = tree.insert_element(wrapper, Element::new("button")).unwrap();
//!
//! let hit_tester = HitTester::new(container, "render-wrapper");
//! let mut button_clicked = false;
//! let delivery = hit_tester.deliver_click(&tree, button, |d| {
//!     button_clicked |= d.node == button;
//!     Outcome::Continue
//! });
//! assert!(delivery.propagation_stopped);
//! assert!(!button_clicked);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod router;
pub mod types;

mod hit;

pub use hit::{ClickDelivery, Classification, DEFAULT_WRAPPER_CLASS, HitTester};
