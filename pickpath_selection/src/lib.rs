// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pickpath Selection: the selection layer of a markup preview.
//!
//! ## Overview
//!
//! A user clicks an element in a preview of untrusted markup. The preview
//! remembers which element was picked, draws a highlight over it, shows its
//! attributes, and lets the user delete it, copy its markup, or scroll to
//! it. The markup can be replaced, zoomed, or scrolled at any time.
//!
//! - [`SelectionStore`] is the state machine. It consumes
//!   [`SelectionEvent`]s against a borrowed [`Scene`] and never holds on to
//!   the tree.
//! - [`GeometryTracker`] projects a live node into the container's content
//!   space as an [`OverlayRect`], and computes [`ScrollRequest`]s.
//! - [`delete_selected`], [`scroll_into_view`], [`serialize`], and
//!   [`inspect`] act on the selection. Each resolves the stored
//!   [`Path`](pickpath_path::Path) again first, so a stale selection is a
//!   no-op rather than an error.
//! - [`SelectionPolicy`] holds the tunable behavior and loads from JSON.
//! - [`PreviewSurface`] ties it together: it owns the tree, turns clicks,
//!   wheel, scroll, and key input into events, and exposes the commands and
//!   read model a host UI binds to.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use pickpath_responder::types::Outcome;
//! use pickpath_selection::{PreviewSurface, SelectionPolicy, StateKind, WheelEvent};
//! use pickpath_tree::Element;
//!
//! let mut surface = PreviewSurface::new(SelectionPolicy::default());
//! surface.set_container_rect(Rect::new(0.0, 0.0, 300.0, 200.0));
//! let heading = surface.update_layout(|tree, wrapper| {
//!     tree.set_local_bounds(wrapper, Rect::new(0.0, 0.0, 300.0, 400.0));
//!     let h1 = tree
//!         .insert_element(wrapper, Element::new("h1").with_attribute("id", "title"))
//!         .unwrap();
//!     tree.set_local_bounds(h1, Rect::new(0.0, 0.0, 300.0, 40.0));
//!     h1
//! });
//!
//! surface.handle_click(heading, |_| Outcome::Continue);
//! assert_eq!(surface.path().unwrap().to_string(), "h1#title");
//!
//! // Zooming clears the selection under the default policy.
//! surface.handle_wheel(WheelEvent::new(-1.0));
//! assert_eq!(surface.state().kind(), StateKind::Empty);
//! assert_eq!(surface.zoom().get(), 1.1);
//! ```

mod geometry;
mod input;
mod inspect;
mod mutation;
mod policy;
mod resolve;
mod store;
mod surface;
mod zoom;

pub use geometry::{
    ContainerGeometry, GeometryTracker, OverlayRect, ScrollAlign, ScrollBehavior, ScrollRequest,
    compute_rect,
};
pub use input::{Key, Modifiers, WheelEvent};
pub use inspect::{ElementInfo, inspect};
pub use mutation::{delete_selected, scroll_into_view, serialize};
pub use policy::{InvalidationMode, PolicyError, PolicyReport, PolicyWarning, SelectionPolicy};
pub use store::{
    Anchor, Scene, SelectionEvent, SelectionState, SelectionStore, StateKind, Transition,
};
pub use surface::PreviewSurface;
pub use zoom::{ZoomLimits, ZoomScale};
