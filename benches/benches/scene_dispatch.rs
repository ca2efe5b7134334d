// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};
use trellis_router::EventRouter;
use trellis_scene::{Container, Event, EventCx, EventKind, NodeId, Scene, Widget};

/// Claims hover and button events, like a module panel in a rack.
struct Module;

impl Widget for Module {
    fn on_event(&mut self, cx: &mut EventCx<'_>, event: &mut Event) {
        cx.recurse(event);
        if event.is_propagating()
            && matches!(event.kind(), EventKind::Hover { .. } | EventKind::Button { .. })
        {
            event.consume(cx.id());
        }
    }
}

/// `n` x `n` modules of 40x40, each holding four 10x10 knobs.
fn gen_rack(n: usize) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let side = n as f64 * 40.0;
    let root = scene.insert(Container, Rect::new(0.0, 0.0, side, side));
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * 40.0;
            let y0 = y as f64 * 40.0;
            let module = scene.insert(Module, Rect::new(x0, y0, x0 + 40.0, y0 + 40.0));
            scene.add_child(root, module).unwrap();
            for k in 0..4 {
                let kx = 5.0 + (k % 2) as f64 * 20.0;
                let ky = 5.0 + (k / 2) as f64 * 20.0;
                let knob = scene.insert(Module, Rect::new(kx, ky, kx + 10.0, ky + 10.0));
                scene.add_child(module, knob).unwrap();
            }
        }
    }
    (scene, root)
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_points(count: usize, extent: f64) -> Vec<Point> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_hover");
    for &n in &[8usize, 16, 32] {
        let (mut scene, root) = gen_rack(n);
        let points = gen_points(256, n as f64 * 40.0);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("rack_n{}", n), |b| {
            b.iter(|| {
                let mut claimed = 0_usize;
                for &pos in &points {
                    let mut event = Event::new(EventKind::Hover {
                        pos,
                        mouse_delta: Vec2::ZERO,
                    });
                    scene.dispatch(root, &mut event);
                    claimed += usize::from(event.target().is_some());
                }
                black_box(claimed);
            });
        });
    }
    group.finish();
}

fn bench_router_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("router_hover");
    for &n in &[8usize, 32] {
        let points = gen_points(256, n as f64 * 40.0);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("sweep_n{}", n), |b| {
            b.iter_batched(
                || {
                    let (scene, root) = gen_rack(n);
                    (scene, EventRouter::new(root))
                },
                |(mut scene, mut router)| {
                    let mut last = Point::ZERO;
                    for &pos in &points {
                        router.handle_hover(&mut scene, pos, pos - last);
                        last = pos;
                    }
                    black_box(router.hovered());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_structure(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure");
    group.bench_function("build_rack_n32", |b| {
        b.iter(|| black_box(gen_rack(32).0.len()));
    });
    group.bench_function("delete_half_rack_n32", |b| {
        b.iter_batched(
            || gen_rack(32),
            |(mut scene, root)| {
                let modules = scene.children_of(root).to_vec();
                for id in modules.into_iter().step_by(2) {
                    scene.request_delete(id);
                }
                let mut canvas = trellis_scene::RecordingCanvas::new();
                scene.step(root, &mut canvas);
                black_box(scene.take_finalized().len());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_router_hover, bench_structure);
criterion_main!(benches);
