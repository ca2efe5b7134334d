// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Rect};
use trellis_cache::{CacheConfig, RenderCache};
use trellis_scene::{
    Canvas, CanvasOp, Container, DrawCx, NodeId, RecordingCanvas, Rgba, Scene, Widget,
};

struct Swatch(Rgba);

impl Widget for Swatch {
    fn draw(&mut self, cx: &mut DrawCx<'_>) {
        let size = cx.rect().size();
        cx.canvas().fill_rect(size.to_rect(), self.0);
    }
}

/// `modules` caches side by side, each over a 16x16 grid of swatches.
fn gen_cached_rack(modules: usize, config: CacheConfig) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let root = scene.insert(
        Container,
        Rect::new(0.0, 0.0, modules as f64 * 64.0, 64.0),
    );
    for m in 0..modules {
        let x0 = m as f64 * 64.0;
        let cache = scene.insert(
            RenderCache::with_config(config),
            Rect::new(x0, 0.0, x0 + 64.0, 64.0),
        );
        scene.add_child(root, cache).unwrap();
        for i in 0..256 {
            let x = (i % 16) as f64 * 4.0;
            let y = (i / 16) as f64 * 4.0;
            let swatch = scene.insert(
                Swatch([0.2, 0.4, 0.8, 1.0]),
                Rect::new(x, y, x + 4.0, y + 4.0),
            );
            scene.add_child(cache, swatch).unwrap();
        }
    }
    (scene, root)
}

fn frame(scene: &mut Scene, root: NodeId, canvas: &mut RecordingCanvas, transform: Affine) {
    scene.step(root, canvas);
    canvas.take_ops();
    canvas.begin_frame(1024, 1024, 1.0);
    canvas.set_transform(transform);
    scene.draw(root, canvas);
    canvas.end_frame();
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_frames");
    for (name, bypassed) in [("cached", false), ("bypassed", true)] {
        let config = CacheConfig {
            bypassed,
            ..CacheConfig::default()
        };
        let (mut scene, root) = gen_cached_rack(16, config);
        let mut canvas = RecordingCanvas::new();
        frame(&mut scene, root, &mut canvas, Affine::IDENTITY);
        frame(&mut scene, root, &mut canvas, Affine::IDENTITY);
        group.bench_function(format!("steady_{name}"), |b| {
            b.iter(|| {
                frame(&mut scene, root, &mut canvas, Affine::IDENTITY);
                black_box(canvas.count(|op| matches!(op, CanvasOp::DrawImage { .. })));
            });
        });
    }
    group.bench_function("zoom_settle", |b| {
        b.iter_batched(
            || {
                let (mut scene, root) = gen_cached_rack(16, CacheConfig::default());
                let mut canvas = RecordingCanvas::new();
                frame(&mut scene, root, &mut canvas, Affine::IDENTITY);
                frame(&mut scene, root, &mut canvas, Affine::IDENTITY);
                (scene, root, canvas)
            },
            |(mut scene, root, mut canvas)| {
                for s in [1.5, 2.0, 2.0, 2.0] {
                    frame(&mut scene, root, &mut canvas, Affine::scale(s));
                }
                black_box(canvas.ops().len());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
