// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics: build a small tree, hit-test it, move things, delete a node.
//!
//! Run:
//! - `cargo run -p trellis_demos --example scene_basics`

use kurbo::{Point, Rect, Size, Vec2};
use trellis_scene::{
    Container, Event, EventCx, EventKind, RecordingCanvas, Scene, Widget,
};

/// Claims hovers and reports them.
struct Panel(&'static str);

impl Widget for Panel {
    fn on_event(&mut self, cx: &mut EventCx<'_>, event: &mut Event) {
        cx.recurse(event);
        if let EventKind::Hover { pos, .. } = event.kind()
            && event.is_propagating()
        {
            println!("  {} hovered at local {:?}", self.0, pos);
            event.consume(cx.id());
        }
    }
}

fn main() {
    let mut scene = Scene::new();
    let root = scene.insert(Container, Rect::new(0.0, 0.0, 400.0, 300.0));
    let rack = scene.insert(Panel("rack"), Rect::new(0.0, 0.0, 400.0, 300.0));
    let vco = scene.insert(Panel("vco"), Rect::new(20.0, 20.0, 120.0, 200.0));
    let vcf = scene.insert(Panel("vcf"), Rect::new(100.0, 20.0, 200.0, 200.0));
    scene.add_child(root, rack).unwrap();
    scene.add_child(rack, vco).unwrap();
    scene.add_child(rack, vcf).unwrap();

    // vcf was added last and overlaps vco, so it wins the overlap.
    println!("== Hover (110, 50) ==");
    let mut hover = Event::new(EventKind::Hover {
        pos: Point::new(110.0, 50.0),
        mouse_delta: Vec2::ZERO,
    });
    scene.dispatch(root, &mut hover);
    assert_eq!(hover.target(), Some(vcf));

    println!("== Move vco to the front of the overlap ==");
    scene.remove_child(rack, vco).unwrap();
    scene.add_child(rack, vco).unwrap();
    let mut hover = Event::new(EventKind::Hover {
        pos: Point::new(110.0, 50.0),
        mouse_delta: Vec2::ZERO,
    });
    scene.dispatch(root, &mut hover);
    assert_eq!(hover.target(), Some(vco));

    scene.set_size(vcf, Size::new(150.0, 180.0));
    println!("  children bbox: {:?}", scene.children_bounding_box(rack));
    println!(
        "  vcf origin in root space: {:?}",
        scene.absolute_offset(vcf, Point::ZERO, None)
    );

    println!("== Delete vco ==");
    scene.request_delete(vco);
    let mut canvas = RecordingCanvas::new();
    scene.step(root, &mut canvas);
    println!("  finalized: {:?}", scene.take_finalized());
    assert!(!scene.is_alive(vco));
    assert_eq!(scene.children_of(rack), &[vcf]);
}
