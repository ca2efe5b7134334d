// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render cache under zoom: the image is stretched while the zoom changes and re-rendered
//! once it settles.
//!
//! Run:
//! - `cargo run -p trellis_demos --example cache_zoom`

use kurbo::{Affine, Rect};
use trellis_cache::RenderCache;
use trellis_scene::{Canvas, CanvasOp, Container, DrawCx, RecordingCanvas, Rgba, Scene, Widget};

struct Swatch(Rgba);

impl Widget for Swatch {
    fn draw(&mut self, cx: &mut DrawCx<'_>) {
        let size = cx.rect().size();
        cx.canvas().fill_rect(size.to_rect(), self.0);
    }
}

fn main() {
    let mut scene = Scene::new();
    let root = scene.insert(Container, Rect::new(0.0, 0.0, 800.0, 600.0));
    let cache = scene.insert(RenderCache::new(), Rect::new(10.0, 10.0, 110.0, 90.0));
    scene.add_child(root, cache).unwrap();
    for i in 0..8 {
        let x = f64::from(i) * 12.0;
        let swatch = scene.insert(Swatch([0.9, 0.3, 0.1, 1.0]), Rect::new(x, 0.0, x + 10.0, 80.0));
        scene.add_child(cache, swatch).unwrap();
    }

    let mut canvas = RecordingCanvas::new();
    let zooms = [1.0, 1.0, 1.0, 1.5, 2.0, 3.0, 3.0, 3.0, 3.0];
    for (frame, zoom) in zooms.into_iter().enumerate() {
        canvas.take_ops();
        scene.step(root, &mut canvas);
        canvas.begin_frame(800, 600, 1.0);
        canvas.set_transform(Affine::scale(zoom));
        scene.draw(root, &mut canvas);
        canvas.end_frame();

        let fills = canvas.count(|op| matches!(op, CanvasOp::FillRect { .. }));
        let blit = canvas.ops().iter().find_map(|op| match op {
            CanvasOp::DrawImage { quad, .. } => Some(*quad),
            _ => None,
        });
        let c = scene.widget::<RenderCache>(cache).unwrap();
        println!(
            "frame {frame}: zoom {zoom:.1}, swatches drawn {fills}, image {:?}, blit {:?}",
            c.image_size(),
            blit
        );
    }

    let stats = scene.widget::<RenderCache>(cache).unwrap().stats();
    println!("{stats:?}");
    assert_eq!(stats.renders, 2);
}
