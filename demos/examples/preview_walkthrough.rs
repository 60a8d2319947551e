// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted session against a preview surface.
//!
//! Renders a small page, lays it out as one row per element, then clicks,
//! zooms, scrolls, and deletes the way a user would, printing the read model
//! after each step. Pass a path to a JSON selection policy to change the
//! behavior, and set `RUST_LOG` to see the selection layer's logs.
//!
//! Run:
//! - `cargo run -p pickpath_demos --example preview_walkthrough`
//! - `RUST_LOG=pickpath_selection=debug cargo run -p pickpath_demos --example preview_walkthrough -- policy.json`

use std::error::Error;
use std::fs;

use kurbo::{Point, Rect};
use pickpath_markup::HtmlRenderer;
use pickpath_responder::types::{Dispatch, Outcome};
use pickpath_selection::{Key, PreviewSurface, SelectionPolicy, WheelEvent};
use pickpath_tree::NodeId;

const PAGE: &str = r#"
<section class="hero">
  <h1 id="title">Launch week</h1>
  <p class="lead">Everything we shipped, in one place.</p>
  <button id="cta" onclick="alert('hi')">Read more</button>
</section>
<ul class="features">
  <li>Faster builds</li>
  <li>Smaller binaries</li>
  <li>Better errors</li>
</ul>
"#;

const WIDTH: f64 = 640.0;
const ROW: f64 = 32.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let policy = match std::env::args().nth(1) {
        Some(path) => SelectionPolicy::from_json_str(&fs::read_to_string(path)?)?,
        None => SelectionPolicy::default(),
    };
    for warning in &policy.validate().warnings {
        println!("policy warning: {warning}");
    }

    let mut surface = PreviewSurface::new(policy);
    surface.set_container_rect(Rect::new(0.0, 80.0, WIDTH, 320.0));
    surface.set_markup(PAGE, &HtmlRenderer::new())?;
    let rows = layout(&mut surface);
    println!("rendered {} elements", rows.len());

    // The page only sees the document's capture entry; the preview selects
    // the button before its own handler would run.
    let point = row_center(&surface, 3);
    let delivery = surface
        .click_at(point, markup_listener)
        .ok_or("nothing under the pointer")?;
    println!("click: {delivery:?}");
    report(&surface)?;

    println!("copy: {:?}", surface.serialize_selection());

    // Zoom in one notch; the default policy drops the selection.
    surface.handle_wheel(WheelEvent::new(-100.0));
    println!("zoom: {}", surface.zoom().get());
    report(&surface)?;

    // Select the last list item and bring it into view.
    surface.set_zoom(1.0);
    let last = rows.last().copied().ok_or("empty page")?;
    surface.select(last);
    let request = surface.scroll_into_view().ok_or("selection is not rendered")?;
    println!("scroll: {request:?}");
    surface.handle_scroll(request.offset);
    report(&surface)?;

    // Scrolling dropped it; select it again and delete it.
    surface.select(last);
    report(&surface)?;
    if surface.handle_key(Key::Delete) {
        println!("deleted; list is now:");
        println!("{}", surface.tree().inner_markup(rows[4]).unwrap_or_default());
    }
    report(&surface)?;
    Ok(())
}

/// One full-width row per element, in document order.
fn layout(surface: &mut PreviewSurface) -> Vec<NodeId> {
    surface.update_layout(|tree, wrapper| {
        let elements: Vec<NodeId> = tree
            .descendants(wrapper)
            .filter(|&n| tree.element(n).is_some())
            .collect();
        let mut y = 0.0;
        for &el in &elements {
            let indent = 16.0 * (tree.ancestors(el).count() as f64 - 3.0);
            tree.set_local_bounds(el, Rect::new(indent, y, WIDTH, y + ROW - 6.0));
            y += ROW;
        }
        tree.set_local_bounds(wrapper, Rect::new(0.0, 0.0, WIDTH, y));
        elements
    })
}

/// A client-space point inside the `row`th element, before zoom and scroll.
fn row_center(surface: &PreviewSurface, row: usize) -> Point {
    let origin = surface.geometry().client_rect.origin();
    Point::new(WIDTH / 2.0, origin.y + row as f64 * ROW + ROW / 2.0 - 3.0)
}

/// Stands in for the page's own click handlers.
fn markup_listener(d: &Dispatch<NodeId>) -> Outcome {
    tracing::info!(node = ?d.node, phase = ?d.phase, "page listener");
    Outcome::Continue
}

fn report(surface: &PreviewSurface) -> Result<(), Box<dyn Error>> {
    match surface.path() {
        Some(path) => {
            println!("selected: {path}");
            println!("overlay: {}", serde_json::to_string(&surface.rect())?);
            if let Some(info) = surface.element_info() {
                println!("inspector: {}", serde_json::to_string_pretty(&info)?);
            }
        }
        None => println!("selected: nothing"),
    }
    Ok(())
}
