// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay geometry and scroll-into-view.
//!
//! Three coordinate spaces are involved:
//!
//! - **world**: the tree's committed space ([`Tree::world_bounds`]);
//! - **client**: the host viewport, where the container occupies
//!   [`ContainerGeometry::client_rect`];
//! - **content**: the container's scrollable content, whose origin is the
//!   container's top-left corner at scroll offset zero. Overlay rects live here,
//!   so they stay put while the container scrolls.

use kurbo::{Point, Rect, Size, Vec2};
use pickpath_path::{FallbackPolicy, Path};
use pickpath_tree::{NodeFlags, NodeId, Tree};
use serde::{Deserialize, Serialize};

use crate::resolve::locate;

/// The scrollable preview container's placement and scroll offset.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContainerGeometry {
    /// The container's box in client space.
    pub client_rect: Rect,
    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    pub scroll: Vec2,
}

impl ContainerGeometry {
    /// A container at `client_rect`, scrolled to the origin.
    pub fn new(client_rect: Rect) -> Self {
        Self {
            client_rect,
            scroll: Vec2::ZERO,
        }
    }

    /// Builder-style scroll offset.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// The visible part of the content, in content space.
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(self.scroll.to_point(), self.client_rect.size())
    }
}

/// Highlight rectangle in container content space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayRect {
    /// Distance from the content's top edge.
    pub top: f64,
    /// Distance from the content's left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl OverlayRect {
    /// The rect as a [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size(
            Point::new(self.left, self.top),
            Size::new(self.width, self.height),
        )
    }
}

impl From<Rect> for OverlayRect {
    fn from(r: Rect) -> Self {
        Self {
            top: r.y0,
            left: r.x0,
            width: r.width(),
            height: r.height(),
        }
    }
}

/// Convert a node's client rect into an overlay rect.
///
/// `top = node.top - container.top + scroll_top`, and likewise for `left`;
/// the size is copied unchanged.
pub fn compute_rect(node_client: Rect, container: &ContainerGeometry) -> OverlayRect {
    OverlayRect {
        top: node_client.y0 - container.client_rect.y0 + container.scroll.y,
        left: node_client.x0 - container.client_rect.x0 + container.scroll.x,
        width: node_client.width(),
        height: node_client.height(),
    }
}

/// How a scroll request should be animated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Animate.
    #[default]
    Smooth,
    /// Jump.
    Instant,
}

/// Alignment when scrolling an element into view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAlign {
    /// Align the element's start edge with the viewport's.
    Start,
    /// Center the element within the viewport.
    #[default]
    Center,
    /// Align the element's end edge with the viewport's.
    End,
    /// Move just enough to make the element fully visible.
    Nearest,
}

/// A scroll the host should perform on the container.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    /// Target scroll offset.
    pub offset: Vec2,
    /// Animation hint.
    pub behavior: ScrollBehavior,
    /// Alignment the offset was computed for.
    pub align: ScrollAlign,
}

/// Scroll offset along one axis that brings `[start, end)` into a viewport of
/// `viewport` length currently scrolled to `current`.
fn align_axis(start: f64, end: f64, viewport: f64, current: f64, align: ScrollAlign) -> f64 {
    let offset = match align {
        ScrollAlign::Start => start,
        ScrollAlign::End => end - viewport,
        ScrollAlign::Center => (start + end) / 2.0 - viewport / 2.0,
        ScrollAlign::Nearest => {
            if start >= current && end <= current + viewport {
                current
            } else if start < current {
                start
            } else {
                end - viewport
            }
        }
    };
    offset.max(0.0)
}

/// Projects live nodes into overlay and client space for one container.
#[derive(Copy, Clone, Debug)]
pub struct GeometryTracker<'a> {
    tree: &'a Tree,
    container: NodeId,
    geometry: &'a ContainerGeometry,
}

impl<'a> GeometryTracker<'a> {
    /// Create a tracker for `container`, placed and scrolled per `geometry`.
    pub fn new(tree: &'a Tree, container: NodeId, geometry: &'a ContainerGeometry) -> Self {
        Self {
            tree,
            container,
            geometry,
        }
    }

    /// The node's committed bounds in client space.
    ///
    /// The container's world origin maps to the container's client origin,
    /// shifted by the scroll offset.
    pub fn client_rect(&self, node: NodeId) -> Option<Rect> {
        let bounds = self.tree.world_bounds(node)?;
        let origin = self.tree.world_transform(self.container)? * Point::ORIGIN;
        let offset = (self.geometry.client_rect.origin() - origin) - self.geometry.scroll;
        Some(bounds + offset)
    }

    /// Returns true if `node` and all its ancestors are visible.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        let visible = |id| {
            self.tree
                .flags(id)
                .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
        };
        visible(node) && self.tree.ancestors(node).all(visible)
    }

    /// The overlay rect for a live, rendered node.
    pub fn rect_of(&self, node: NodeId) -> Option<OverlayRect> {
        if !self.is_rendered(node) {
            return None;
        }
        self.client_rect(node)
            .map(|client| compute_rect(client, self.geometry))
    }

    /// Re-resolve `path` under `root` and compute the overlay rect.
    ///
    /// Returns the resolved node with its rect, or `None` if the path no
    /// longer resolves. The rect is `None` when the node is not rendered.
    pub fn track(
        &self,
        path: &Path,
        root: NodeId,
        fallback: FallbackPolicy,
    ) -> Option<(NodeId, Option<OverlayRect>)> {
        let node = locate(self.tree, path, root, fallback)?;
        Some((node, self.rect_of(node)))
    }

    /// The scroll that brings `node` into view with `align`.
    pub fn scroll_request(&self, node: NodeId, align: ScrollAlign) -> Option<ScrollRequest> {
        let content = self.rect_of(node)?.to_rect();
        let viewport = self.geometry.client_rect.size();
        let current = self.geometry.scroll;
        let offset = Vec2::new(
            align_axis(content.x0, content.x1, viewport.width, current.x, align),
            align_axis(content.y0, content.y1, viewport.height, current.y, align),
        );
        Some(ScrollRequest {
            offset,
            behavior: ScrollBehavior::Smooth,
            align,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Affine;
    use pickpath_tree::Element;

    #[test]
    fn compute_rect_adds_scroll_and_removes_container_origin() {
        let container = ContainerGeometry::new(Rect::new(100.0, 50.0, 500.0, 350.0))
            .with_scroll(Vec2::new(0.0, 40.0));
        let r = compute_rect(Rect::new(130.0, 90.0, 180.0, 110.5), &container);
        assert_eq!(
            r,
            OverlayRect {
                top: 80.0,
                left: 30.0,
                width: 50.0,
                height: 20.5,
            }
        );
    }

    struct Fixture {
        tree: Tree,
        container: NodeId,
        wrapper: NodeId,
        child: NodeId,
    }

    fn fixture(zoom: f64) -> Fixture {
        let mut tree = Tree::new();
        let doc = tree.document();
        let container = tree.insert_element(doc, Element::new("main")).unwrap();
        let wrapper = tree.insert_element(container, Element::new("div")).unwrap();
        let child = tree.insert_element(wrapper, Element::new("p")).unwrap();
        // The container sits at (20, 30) in world space.
        tree.set_local_transform(container, Affine::translate((20.0, 30.0)));
        tree.set_local_bounds(container, Rect::new(0.0, 0.0, 400.0, 300.0));
        tree.set_local_bounds(wrapper, Rect::new(0.0, 0.0, 400.0, 1000.0));
        tree.set_local_transform(wrapper, Affine::scale(zoom));
        tree.set_local_bounds(child, Rect::new(10.0, 600.0, 110.0, 640.0));
        tree.commit();
        Fixture {
            tree,
            container,
            wrapper,
            child,
        }
    }

    #[test]
    fn overlay_is_stable_under_scroll() {
        let f = fixture(1.0);
        let at_rest = ContainerGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        let scrolled = at_rest.with_scroll(Vec2::new(0.0, 250.0));
        let a = GeometryTracker::new(&f.tree, f.container, &at_rest).rect_of(f.child);
        let b = GeometryTracker::new(&f.tree, f.container, &scrolled).rect_of(f.child);
        assert_eq!(a, b);
        assert_eq!(a.unwrap().top, 600.0);
        // The client rect does move.
        let client = GeometryTracker::new(&f.tree, f.container, &scrolled)
            .client_rect(f.child)
            .unwrap();
        assert_eq!(client.y0, 350.0);
    }

    #[test]
    fn overlay_scales_with_zoom() {
        let f = fixture(1.5);
        let geometry = ContainerGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        let r = GeometryTracker::new(&f.tree, f.container, &geometry)
            .rect_of(f.child)
            .unwrap();
        assert_eq!(r.width, 150.0);
        assert_eq!(r.height, 60.0);
        assert_eq!(r.left, 15.0);
        assert_eq!(r.top, 900.0);
    }

    #[test]
    fn hidden_ancestor_hides_the_overlay() {
        let mut f = fixture(1.0);
        f.tree.set_flags(f.wrapper, NodeFlags::PICKABLE);
        f.tree.commit();
        let geometry = ContainerGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        let tracker = GeometryTracker::new(&f.tree, f.container, &geometry);
        assert!(!tracker.is_rendered(f.child));
        assert_eq!(tracker.rect_of(f.child), None);
    }

    #[test]
    fn center_alignment_centers_and_clamps() {
        let f = fixture(1.0);
        let geometry = ContainerGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        let tracker = GeometryTracker::new(&f.tree, f.container, &geometry);
        let req = tracker.scroll_request(f.child, ScrollAlign::Center).unwrap();
        // Vertical: (600 + 640) / 2 - 150. Horizontal: would be negative, clamped.
        assert_eq!(req.offset, Vec2::new(0.0, 470.0));
        assert_eq!(req.behavior, ScrollBehavior::Smooth);
        assert_eq!(req.align, ScrollAlign::Center);
    }

    #[test]
    fn other_alignments() {
        let f = fixture(1.0);
        let geometry = ContainerGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0))
            .with_scroll(Vec2::new(0.0, 500.0));
        let tracker = GeometryTracker::new(&f.tree, f.container, &geometry);
        let start = tracker.scroll_request(f.child, ScrollAlign::Start).unwrap();
        assert_eq!(start.offset.y, 600.0);
        let end = tracker.scroll_request(f.child, ScrollAlign::End).unwrap();
        assert_eq!(end.offset.y, 340.0);
        // Already fully visible at 500..800.
        let nearest = tracker.scroll_request(f.child, ScrollAlign::Nearest).unwrap();
        assert_eq!(nearest.offset.y, 500.0);
    }

    #[test]
    fn viewport_is_in_content_space() {
        let geometry = ContainerGeometry::new(Rect::new(5.0, 5.0, 105.0, 55.0))
            .with_scroll(Vec2::new(10.0, 20.0));
        assert_eq!(geometry.viewport(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }
}
