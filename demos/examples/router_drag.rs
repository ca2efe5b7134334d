// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router roles: hover, select and drag a module onto another, printing every transition.
//!
//! Run:
//! - `cargo run -p trellis_demos --example router_drag`

use core::time::Duration;

use kurbo::{Point, Rect, Vec2};
use trellis_router::EventRouter;
use trellis_scene::{
    Container, Event, EventCx, EventKind, InputAction, Modifiers, MouseButton, Propagation,
    Scene, Widget,
};

/// Claims positional input and logs what reaches it.
struct Module(&'static str);

impl Widget for Module {
    fn on_event(&mut self, cx: &mut EventCx<'_>, event: &mut Event) {
        cx.recurse(event);
        match event.kind().propagation() {
            Propagation::Positional if event.is_propagating() => {
                if !matches!(event.kind(), EventKind::Hover { .. }) {
                    println!("  {:<4} <- {:?}", self.0, event.kind());
                }
                event.consume(cx.id());
            }
            Propagation::Direct => println!("  {:<4} <- {:?}", self.0, event.kind()),
            _ => {}
        }
    }
}

fn main() {
    let mut scene = Scene::new();
    let root = scene.insert(Container, Rect::new(0.0, 0.0, 300.0, 100.0));
    let lfo = scene.insert(Module("lfo"), Rect::new(0.0, 0.0, 100.0, 100.0));
    let vca = scene.insert(Module("vca"), Rect::new(200.0, 0.0, 300.0, 100.0));
    scene.add_child(root, lfo).unwrap();
    scene.add_child(root, vca).unwrap();

    let mut router = EventRouter::new(root);
    let mut time = Duration::ZERO;
    let mut press = |router: &mut EventRouter, scene: &mut Scene, action| {
        time += Duration::from_millis(100);
        router.handle_button(scene, MouseButton::Primary, action, Modifiers::empty(), time)
    };

    println!("== Hover lfo ==");
    router.handle_hover(&mut scene, Point::new(50.0, 50.0), Vec2::ZERO);

    println!("== Press: select and start dragging lfo ==");
    press(&mut router, &mut scene, InputAction::Press);
    assert_eq!(router.selected(), Some(lfo));
    assert_eq!(router.dragged(), Some(lfo));

    println!("== Drag over vca ==");
    router.handle_hover(&mut scene, Point::new(250.0, 50.0), Vec2::new(200.0, 0.0));
    assert_eq!(router.drag_hovered(), Some(vca));

    println!("== Release over vca ==");
    press(&mut router, &mut scene, InputAction::Release);
    assert_eq!(router.dragged(), None);

    println!("== Double click vca ==");
    press(&mut router, &mut scene, InputAction::Press);
    press(&mut router, &mut scene, InputAction::Release);
    press(&mut router, &mut scene, InputAction::Press);
    press(&mut router, &mut scene, InputAction::Release);
    assert_eq!(router.selected(), Some(vca));
}
