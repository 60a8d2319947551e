// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The preview surface: one container, one render wrapper, one selection.
//!
//! [`PreviewSurface`] owns every piece of state the preview needs and turns
//! host input into [`SelectionEvent`]s. The tree it hands out is always
//! committed: every method that mutates the tree commits it before the
//! selection transition runs, so geometry is never read from a stale frame
//! or from a node that was just removed.

use kurbo::{Point, Rect, Vec2};
use pickpath_path::Path;
use pickpath_responder::types::{Dispatch, Outcome};
use pickpath_responder::{ClickDelivery, Classification, HitTester};
use pickpath_tree::{Element, MarkupRenderer, NodeId, Tree};

use crate::geometry::{ContainerGeometry, OverlayRect, ScrollRequest};
use crate::input::{Key, WheelEvent};
use crate::inspect::{ElementInfo, inspect};
use crate::mutation::{delete_selected, scroll_into_view, serialize};
use crate::policy::SelectionPolicy;
use crate::store::{Scene, SelectionEvent, SelectionState, SelectionStore, Transition};
use crate::zoom::ZoomScale;

/// A preview container with its render wrapper and selection.
///
/// ```rust
/// use kurbo::Rect;
/// use pickpath_selection::{PreviewSurface, SelectionPolicy};
/// use pickpath_tree::Element;
///
/// let mut surface = PreviewSurface::new(SelectionPolicy::default());
/// surface.set_container_rect(Rect::new(0.0, 0.0, 400.0, 300.0));
/// let button = surface.update_layout(|tree, wrapper| {
///     tree.set_local_bounds(wrapper, Rect::new(0.0, 0.0, 400.0, 300.0));
///     let button = tree.insert_element(wrapper, Element::new("button")).unwrap();
///     tree.set_local_bounds(button, Rect::new(10.0, 10.0, 90.0, 40.0));
///     button
/// });
///
/// surface.select(button);
/// assert_eq!(surface.path().unwrap().to_string(), "button");
/// assert_eq!(surface.rect().unwrap().width, 80.0);
/// ```
#[derive(Debug)]
pub struct PreviewSurface {
    tree: Tree,
    container: NodeId,
    wrapper: NodeId,
    hit_tester: HitTester,
    geometry: ContainerGeometry,
    store: SelectionStore,
    zoom: ZoomScale,
    policy: SelectionPolicy,
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self::new(SelectionPolicy::default())
    }
}

impl PreviewSurface {
    /// Build an empty preview: a container holding an empty render wrapper.
    ///
    /// Policy warnings are logged, not rejected.
    pub fn new(policy: SelectionPolicy) -> Self {
        policy.validate().log();
        let mut tree = Tree::new();
        let doc = tree.document();
        let container = tree
            .insert_element(
                doc,
                Element::new("div").with_attribute("class", "preview-container"),
            )
            .expect("the document accepts element children");
        let wrapper = tree
            .insert_element(
                container,
                Element::new("div").with_attribute("class", &policy.wrapper_class),
            )
            .expect("a fresh element accepts element children");
        tree.commit();
        Self {
            tree,
            container,
            wrapper,
            hit_tester: HitTester::new(container, policy.wrapper_class.clone()),
            geometry: ContainerGeometry::default(),
            store: SelectionStore::new(),
            zoom: ZoomScale::IDENTITY,
            policy,
        }
    }

    /// The committed tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The scrollable container.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The render wrapper; rendered markup lives under it.
    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    /// The hit tester for the container.
    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    /// The active policy.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Container placement and scroll.
    pub fn geometry(&self) -> &ContainerGeometry {
        &self.geometry
    }

    /// Place the container in client space and size its node to match.
    pub fn set_container_rect(&mut self, rect: Rect) {
        self.geometry.client_rect = rect;
        self.tree.set_local_bounds(
            self.container,
            Rect::from_origin_size(Point::ORIGIN, rect.size()),
        );
        self.tree.commit();
    }

    /// Run host layout against the tree, then commit it.
    ///
    /// `f` receives the tree and the render wrapper. The current overlay
    /// rect is a snapshot and is not refreshed by layout.
    pub fn update_layout<R>(&mut self, f: impl FnOnce(&mut Tree, NodeId) -> R) -> R {
        let out = f(&mut self.tree, self.wrapper);
        self.tree.commit();
        out
    }

    /// A read-only view for the free functions in this crate.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            tree: &self.tree,
            container: self.container,
            wrapper: self.wrapper,
            geometry: &self.geometry,
            policy: &self.policy,
        }
    }

    // --- read model ---

    /// The current selection.
    pub fn state(&self) -> &SelectionState {
        self.store.state()
    }

    /// The selected path.
    pub fn path(&self) -> Option<&Path> {
        self.store.state().path()
    }

    /// The overlay rect.
    pub fn rect(&self) -> Option<OverlayRect> {
        self.store.state().rect()
    }

    /// The current zoom.
    pub fn zoom(&self) -> ZoomScale {
        self.zoom
    }

    /// Inspector data for the selected element, resolved fresh.
    pub fn element_info(&self) -> Option<ElementInfo> {
        inspect(&self.scene(), self.path()?)
    }

    // --- commands ---

    /// Select `node`. Leaves the selection empty if `node` is not a rendered
    /// element under the wrapper.
    pub fn select(&mut self, node: NodeId) -> Transition {
        self.apply(SelectionEvent::Select(node))
    }

    /// Clear the selection.
    pub fn deselect(&mut self) -> Transition {
        self.apply(SelectionEvent::Deselect)
    }

    /// Delete the selected element.
    ///
    /// Returns the removed id, or `None` if nothing was selected or the
    /// selection no longer resolves. Either way the selection ends empty.
    pub fn delete(&mut self) -> Option<NodeId> {
        let path = self.path()?.clone();
        let removed = delete_selected(&mut self.tree, &path, self.wrapper, self.policy.fallback);
        self.tree.commit();
        self.apply(SelectionEvent::Deleted);
        removed
    }

    /// The scroll that brings the selection into view. The host performs it
    /// and reports the new offset through [`handle_scroll`](Self::handle_scroll).
    pub fn scroll_into_view(&self) -> Option<ScrollRequest> {
        scroll_into_view(&self.scene(), self.path()?)
    }

    /// Outer markup of the selected element.
    pub fn serialize_selection(&self) -> Option<String> {
        serialize(&self.scene(), self.path()?)
    }

    /// Replace the rendered markup and clear the selection.
    ///
    /// On a render error the wrapper is left empty and the error is returned;
    /// the selection is cleared either way.
    pub fn set_markup<R: MarkupRenderer>(
        &mut self,
        markup: &str,
        renderer: &R,
    ) -> Result<Transition, R::Error> {
        self.tree.clear_children(self.wrapper);
        let rendered = renderer.render(markup, &mut self.tree, self.wrapper);
        if rendered.is_err() {
            self.tree.clear_children(self.wrapper);
        }
        self.tree.commit();
        tracing::debug!(
            bytes = markup.len(),
            ok = rendered.is_ok(),
            "markup replaced"
        );
        let transition = self.apply(SelectionEvent::MarkupReplaced);
        rendered.map(|()| transition)
    }

    /// Set the zoom, clamped to the policy's limits.
    ///
    /// A value that clamps to the current zoom changes nothing.
    pub fn set_zoom(&mut self, scale: f64) -> Transition {
        self.zoom_to(ZoomScale::new(scale, &self.policy.zoom))
    }

    // --- input ---

    /// Deliver a click on `target`.
    ///
    /// `handler` stands in for every other click listener on the target's
    /// path; see [`HitTester::deliver_click`]. The selection changes only
    /// when the click lands inside the container.
    pub fn handle_click(
        &mut self,
        target: NodeId,
        handler: impl FnMut(&Dispatch<NodeId>) -> Outcome,
    ) -> ClickDelivery {
        let delivery = self.hit_tester.deliver_click(&self.tree, target, handler);
        match delivery.classification {
            Some(Classification::Select(node)) => {
                self.apply(SelectionEvent::Select(node));
            }
            Some(Classification::Deselect) => {
                self.apply(SelectionEvent::Deselect);
            }
            None => {}
        }
        delivery
    }

    /// Deliver a click at a client-space point.
    ///
    /// Returns `None` when the point is outside the container's client rect
    /// or nothing pickable is under it. Content overflowing the container is
    /// not visible there, so such clicks belong to the host page.
    pub fn click_at(
        &mut self,
        point: Point,
        handler: impl FnMut(&Dispatch<NodeId>) -> Outcome,
    ) -> Option<ClickDelivery> {
        if !self.geometry.client_rect.contains(point) {
            return None;
        }
        let world = point - self.client_offset();
        let target = self.hit_tester.target_at(&self.tree, world)?;
        Some(self.handle_click(target, handler))
    }

    /// Handle a wheel notification over the preview.
    ///
    /// Returns `None` if the event is left to the platform (a platform
    /// modifier is held, or there is no vertical delta).
    pub fn handle_wheel(&mut self, event: WheelEvent) -> Option<Transition> {
        let steps = event.zoom_steps();
        if steps == 0 {
            return None;
        }
        Some(self.zoom_to(self.zoom.stepped(steps, &self.policy.zoom)))
    }

    /// The container scrolled to `offset`.
    pub fn handle_scroll(&mut self, offset: Vec2) -> Transition {
        self.geometry.scroll = offset;
        self.apply(SelectionEvent::Scrolled)
    }

    /// Handle a key press. Returns true if it deleted the selection.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !key.deletes() || self.path().is_none() {
            return false;
        }
        self.delete().is_some()
    }

    // --- internals ---

    fn zoom_to(&mut self, zoom: ZoomScale) -> Transition {
        if zoom == self.zoom {
            let kind = self.store.state().kind();
            return Transition {
                before: kind,
                after: kind,
                changed: false,
            };
        }
        tracing::debug!(from = self.zoom.get(), to = zoom.get(), "zoom");
        self.zoom = zoom;
        self.tree
            .set_local_transform(self.wrapper, zoom.to_affine());
        self.tree.commit();
        self.apply(SelectionEvent::ZoomChanged)
    }

    /// Offset from world space to client space, scroll included.
    fn client_offset(&self) -> Vec2 {
        let origin = self
            .tree
            .world_transform(self.container)
            .map_or(Point::ORIGIN, |tf| tf * Point::ORIGIN);
        (self.geometry.client_rect.origin() - origin) - self.geometry.scroll
    }

    fn apply(&mut self, event: SelectionEvent) -> Transition {
        let Self {
            tree,
            container,
            wrapper,
            geometry,
            policy,
            store,
            ..
        } = self;
        let scene = Scene {
            tree,
            container: *container,
            wrapper: *wrapper,
            geometry,
            policy,
        };
        store.apply(event, &scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::policy::InvalidationMode;
    use crate::store::StateKind;
    use pickpath_responder::types::Phase;

    /// A 400x300 container holding three 80px-tall sections, 100px apart.
    fn surface(policy: SelectionPolicy) -> (PreviewSurface, Vec<NodeId>) {
        let mut s = PreviewSurface::new(policy);
        s.set_container_rect(Rect::new(20.0, 50.0, 420.0, 350.0));
        let sections = s.update_layout(|tree, wrapper| {
            tree.set_local_bounds(wrapper, Rect::new(0.0, 0.0, 400.0, 600.0));
            (0..3)
                .map(|i| {
                    let el = tree
                        .insert_element(
                            wrapper,
                            Element::new("section").with_attribute("class", "card"),
                        )
                        .unwrap();
                    tree.insert_text(el, format!("card {i}")).unwrap();
                    let y = f64::from(i) * 100.0;
                    tree.set_local_bounds(el, Rect::new(0.0, y, 400.0, y + 80.0));
                    el
                })
                .collect()
        });
        (s, sections)
    }

    #[test]
    fn new_surface_is_empty_and_unzoomed() {
        let s = PreviewSurface::default();
        assert_eq!(s.state(), &SelectionState::Empty);
        assert_eq!(s.zoom(), ZoomScale::IDENTITY);
        assert_eq!(s.hit_tester().wrapper(s.tree()), Some(s.wrapper()));
        assert!(!s.tree().needs_commit());
    }

    #[test]
    fn click_selects_and_reports_content_rect() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        let delivery = s
            .click_at(Point::new(60.0, 170.0), |_| Outcome::Continue)
            .unwrap();
        assert_eq!(
            delivery.classification,
            Some(Classification::Select(sections[1]))
        );
        assert!(delivery.propagation_stopped);
        assert_eq!(
            s.path().unwrap().to_string(),
            "section.card:nth-of-type(2)"
        );
        let rect = s.rect().unwrap();
        assert_eq!((rect.left, rect.top, rect.height), (0.0, 100.0, 80.0));
    }

    #[test]
    fn click_on_wrapper_space_deselects() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[0]);
        let mut phases = Vec::new();
        let delivery = s
            .click_at(Point::new(60.0, 140.0), |d| {
                phases.push(d.phase);
                Outcome::Continue
            })
            .unwrap();
        assert_eq!(delivery.classification, Some(Classification::Deselect));
        assert!(!delivery.propagation_stopped);
        assert_eq!(phases.last(), Some(&Phase::Bubble));
        assert_eq!(s.state(), &SelectionState::Empty);
    }

    #[test]
    fn scroll_drops_by_default_and_reprojects_on_request() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[2]);
        let t = s.handle_scroll(Vec2::new(0.0, 120.0));
        assert_eq!(t.after, StateKind::Empty);

        let policy = SelectionPolicy {
            on_scroll: InvalidationMode::Reproject,
            ..SelectionPolicy::default()
        };
        let (mut s, sections) = surface(policy);
        s.select(sections[2]);
        let before = s.rect();
        let t = s.handle_scroll(Vec2::new(0.0, 120.0));
        assert_eq!(t.after, StateKind::Selected);
        assert_eq!(s.rect(), before);
    }

    #[test]
    fn wheel_zooms_unless_platform_modifier_held() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[0]);
        assert_eq!(
            s.handle_wheel(WheelEvent::new(-3.0).with_modifiers(Modifiers::CTRL)),
            None
        );
        assert_eq!(s.zoom(), ZoomScale::IDENTITY);
        assert_eq!(s.state().kind(), StateKind::Selected);

        let t = s.handle_wheel(WheelEvent::new(-3.0)).unwrap();
        assert_eq!(s.zoom().get(), 1.1);
        assert_eq!(t.after, StateKind::Empty);
        assert_eq!(
            s.tree().local_geometry(s.wrapper()).unwrap().local_transform,
            ZoomScale::new(1.1, &s.policy().zoom).to_affine()
        );
    }

    #[test]
    fn zoom_at_limit_is_a_no_op() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.set_zoom(5.0);
        s.select(sections[0]);
        let t = s.handle_wheel(WheelEvent::new(-1.0)).unwrap();
        assert!(!t.changed);
        assert_eq!(s.zoom().get(), 5.0);
        assert_eq!(s.state().kind(), StateKind::Selected);
    }

    #[test]
    fn delete_key_removes_selection_once() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        assert!(!s.handle_key(Key::Delete));
        s.select(sections[1]);
        assert!(!s.handle_key(Key::Other));
        assert!(s.handle_key(Key::Backspace));
        assert!(!s.tree().is_alive(sections[1]));
        assert_eq!(s.state(), &SelectionState::Empty);
        assert!(!s.tree().needs_commit());
        assert!(!s.handle_key(Key::Delete));
        assert_eq!(s.tree().children_of(s.wrapper()).len(), 2);
    }

    #[test]
    fn delete_key_on_a_stale_selection_reports_nothing_deleted() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[1]);
        s.update_layout(|tree, _| tree.remove(sections[1]));
        assert!(!s.handle_key(Key::Delete));
        assert_eq!(s.state(), &SelectionState::Empty);
        assert_eq!(s.tree().children_of(s.wrapper()).len(), 2);
    }

    #[test]
    fn clicks_outside_the_container_are_not_picked() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[0]);
        // Inside the wrapper's overflow, below the container's client rect.
        let below = s.update_layout(|tree, wrapper| {
            let el = tree.insert_element(wrapper, Element::new("footer")).unwrap();
            tree.set_local_bounds(el, Rect::new(0.0, 400.0, 400.0, 480.0));
            el
        });
        let mut seen = Vec::new();
        let delivery = s.click_at(Point::new(60.0, 460.0), |d| {
            seen.push(d.node);
            Outcome::Continue
        });
        assert_eq!(delivery, None);
        assert!(seen.is_empty());
        assert_eq!(s.state().kind(), StateKind::Selected);
        assert!(s.tree().is_alive(below));

        // Left of the container, level with a section.
        assert_eq!(s.click_at(Point::new(5.0, 70.0), |_| Outcome::Continue), None);
        assert_eq!(s.path().unwrap().to_string(), "section.card:nth-of-type(1)");
    }

    #[test]
    fn read_model_follows_the_live_node() {
        let (mut s, sections) = surface(SelectionPolicy::default());
        s.select(sections[0]);
        assert_eq!(
            s.serialize_selection().as_deref(),
            Some(r#"<section class="card">card 0</section>"#)
        );
        let info = s.element_info().unwrap();
        assert_eq!(info.tag, "section");
        assert_eq!(info.text, "card 0");
        let request = s.scroll_into_view().unwrap();
        assert_eq!(request.offset, Vec2::ZERO);
    }
}
