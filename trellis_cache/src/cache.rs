// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render cache widget.
//!
//! ## Overview
//!
//! A [`RenderCache`] node draws its children once into an offscreen image and blits that
//! image on later frames. Its lifecycle is split across the two per-frame passes:
//!
//! - Draw observes the canvas transform, decides whether the cached image is stale, and
//!   blits whatever image exists.
//! - Step re-renders a stale image, using the transform observed by the latest draw.
//!
//! ## Invalidation
//!
//! - The sub-pixel part of the translation moved by at least
//!   [`CacheConfig::subpixel_tolerance`] since the last render.
//! - The scale differs from the last render and has been the same on two consecutive
//!   draws. While the scale keeps changing (a zoom gesture), the old image is stretched
//!   instead, so a zoom costs one re-render once it settles rather than one per frame.
//!   A single scale step is therefore re-rendered one update pass late: the first draw
//!   at the new scale only stretches, the second marks the cache dirty.
//! - A `Dirty` or `ContextDestroy` broadcast reached the node.
//!
//! The dirty flag is cleared before every render attempt, so a render that fails (no
//! pixels to draw, allocation failure) is not retried every frame.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use tracing::{debug, trace, warn};
use trellis_scene::{Canvas, DrawCx, Event, EventCx, EventKind, ImageId, StepCx, Widget};

use crate::transform::PixelTransform;

/// Tunable cache policies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CacheConfig {
    /// Resolution multiplier for rendering before filtering down to the cached image.
    pub oversample: f64,
    /// Re-render when the sub-pixel offset moves.
    pub dirty_on_subpixel_change: bool,
    /// Sub-pixel movement, in pixels, that counts as a move.
    pub subpixel_tolerance: f64,
    /// Draw the children directly and never cache.
    pub bypassed: bool,
    /// Maximum offscreen renders per update pass across all caches in the scene.
    pub frame_render_limit: Option<u32>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            oversample: 1.0,
            dirty_on_subpixel_change: true,
            subpixel_tolerance: 0.1,
            bypassed: false,
            frame_render_limit: None,
        }
    }
}

/// Counters for observing cache behavior.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Offscreen images allocated for the cached image.
    pub allocations: u32,
    /// Successful renders into the cached image.
    pub renders: u32,
    /// Render attempts abandoned (nothing to draw, or allocation failure).
    pub skipped: u32,
}

/// Widget that caches its subtree in an offscreen image.
#[derive(Clone, Debug)]
pub struct RenderCache {
    config: CacheConfig,
    dirty: bool,
    image: Option<ImageId>,
    image_size: (u32, u32),
    // Pixel-aligned box of the image, in target space at `render_scale`.
    world_box: Rect,
    render_scale: Vec2,
    render_offset_f: Vec2,
    // Transform seen by the latest draw.
    live: Option<PixelTransform>,
    stats: CacheStats,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderCache {
    /// Create a cache with default policies.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with explicit policies.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            dirty: true,
            image: None,
            image_size: (0, 0),
            world_box: Rect::ZERO,
            render_scale: Vec2::ZERO,
            render_offset_f: Vec2::ZERO,
            live: None,
            stats: CacheStats::default(),
        }
    }

    /// Current policies.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Bypass or re-enable caching.
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.config.bypassed = bypassed;
        self.dirty = true;
    }

    /// Change the oversampling factor. Takes effect on the next render.
    pub fn set_oversample(&mut self, oversample: f64) {
        self.config.oversample = oversample;
        self.dirty = true;
    }

    /// Enable or disable re-rendering on sub-pixel movement.
    pub fn set_dirty_on_subpixel_change(&mut self, enabled: bool) {
        self.config.dirty_on_subpixel_change = enabled;
    }

    /// Request a re-render on the next update pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True if a re-render is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The cached image, if one has been rendered.
    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    /// Pixel size of the cached image.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.map(|_| self.image_size)
    }

    /// Target-space box the cached image covers at the scale it was rendered at.
    pub fn world_box(&self) -> Option<Rect> {
        self.image.map(|_| self.world_box)
    }

    /// Counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn observe(&mut self, live: PixelTransform) {
        if self.config.dirty_on_subpixel_change {
            let tolerance = self.config.subpixel_tolerance;
            if (live.offset_f - self.render_offset_f).hypot2() >= tolerance * tolerance {
                self.dirty = true;
            }
        }
        if live.scale != self.render_scale {
            let settled = self.live.is_some_and(|prev| prev.scale == live.scale);
            if self.image.is_none() || settled {
                self.dirty = true;
            }
        }
        self.live = Some(live);
    }

    fn drop_image(&mut self, canvas: &mut dyn Canvas) {
        if let Some(image) = self.image.take() {
            canvas.delete_image(image);
        }
        self.image_size = (0, 0);
    }

    fn render(&mut self, cx: &mut StepCx<'_>, live: PixelTransform) {
        self.dirty = false;
        self.render_scale = live.scale;
        self.render_offset_f = live.offset_f;

        let id = cx.id();
        let own = Rect::from_origin_size(Point::ZERO, cx.rect().size());
        let local = if cx.scene().children_of(id).is_empty() {
            own
        } else {
            cx.scene().visible_children_bounding_box(id)
        };
        let world = snap_to_pixels(local, live);
        self.world_box = world;
        let pixel_ratio = cx.canvas().pixel_ratio().max(1.0);

        let Some((width, height)) = pixel_size(world.size() * pixel_ratio) else {
            debug!(?id, ?world, "render cache has nothing to render");
            self.drop_image(cx.canvas());
            self.stats.skipped += 1;
            return;
        };

        let image = match self.image {
            Some(image) if self.image_size == (width, height) => image,
            _ => {
                self.drop_image(cx.canvas());
                match cx.canvas().create_image(width, height) {
                    Ok(image) => {
                        self.image = Some(image);
                        self.image_size = (width, height);
                        self.stats.allocations += 1;
                        image
                    }
                    Err(err) => {
                        warn!(?id, %err, "render cache image could not be allocated");
                        self.stats.skipped += 1;
                        return;
                    }
                }
            }
        };

        if self.config.oversample == 1.0 {
            cx.canvas().bind_image(Some(image));
            draw_subtree(cx, world, live, width, own);
            cx.canvas().bind_image(None);
        } else {
            let size = Size::new(f64::from(width), f64::from(height)) * self.config.oversample;
            // On failure the main image holds nothing valid for `world`, so drop it.
            let Some((over_width, over_height)) = pixel_size(size) else {
                warn!(?id, oversample = self.config.oversample, "invalid oversampling factor");
                self.drop_image(cx.canvas());
                self.stats.skipped += 1;
                return;
            };
            let over = match cx.canvas().create_image(over_width, over_height) {
                Ok(over) => over,
                Err(err) => {
                    warn!(?id, %err, "oversampled render cache image could not be allocated");
                    self.drop_image(cx.canvas());
                    self.stats.skipped += 1;
                    return;
                }
            };
            cx.canvas().bind_image(Some(over));
            draw_subtree(cx, world, live, over_width, own);
            cx.canvas().bind_image(None);

            let canvas = cx.canvas();
            canvas.bind_image(Some(image));
            canvas.begin_frame(width, height, 1.0);
            canvas.filter_image(over, image);
            canvas.end_frame();
            canvas.bind_image(None);
            canvas.delete_image(over);
        }
        self.stats.renders += 1;
        trace!(?id, width, height, "render cache rendered");
    }
}

impl Widget for RenderCache {
    fn on_event(&mut self, cx: &mut EventCx<'_>, event: &mut Event) {
        match event.kind() {
            EventKind::Dirty => self.dirty = true,
            EventKind::ContextDestroy => {
                // Images die with the context; only the handle is forgotten here.
                self.image = None;
                self.image_size = (0, 0);
                self.dirty = true;
            }
            _ => {}
        }
        cx.recurse(event);
    }

    fn step(&mut self, cx: &mut StepCx<'_>) {
        cx.step_children();
        if self.config.bypassed || !self.dirty {
            return;
        }
        // The scale is only known once a draw has observed the transform.
        let Some(live) = self.live else {
            return;
        };
        if let Some(limit) = self.config.frame_render_limit
            && cx.offscreen_renders() >= limit
        {
            trace!(id = ?cx.id(), limit, "render cache deferred by frame budget");
            return;
        }
        cx.note_offscreen_render();
        self.render(cx, live);
    }

    fn draw(&mut self, cx: &mut DrawCx<'_>) {
        if self.config.bypassed || cx.in_offscreen() {
            cx.draw_children();
            return;
        }
        let live = match PixelTransform::decompose(cx.canvas().transform()) {
            Ok(live) => live,
            Err(err) => {
                warn!(id = ?cx.id(), %err, "render cache not drawn");
                return;
            }
        };
        self.observe(live);
        let Some(image) = self.image else {
            return;
        };
        let ratio = Vec2::new(
            live.scale.x / self.render_scale.x,
            live.scale.y / self.render_scale.y,
        );
        let b = self.world_box;
        let quad = Rect::new(b.x0 * ratio.x, b.y0 * ratio.y, b.x1 * ratio.x, b.y1 * ratio.y)
            + live.offset_i;
        cx.canvas().draw_image(image, quad, Affine::IDENTITY);
    }

    fn release(&mut self, canvas: &mut dyn Canvas) {
        self.drop_image(canvas);
    }
}

/// Map `local` into target space and expand it outward to whole pixels.
fn snap_to_pixels(local: Rect, t: PixelTransform) -> Rect {
    let min = Vec2::new(local.x0 * t.scale.x, local.y0 * t.scale.y) + t.offset_f;
    let max = Vec2::new(local.x1 * t.scale.x, local.y1 * t.scale.y) + t.offset_f;
    let (min, max) = (min.floor(), max.ceil());
    Rect::new(min.x, min.y, max.x, max.y)
}

/// Round `size` up to whole pixels; `None` if that is empty, non-finite, or too large.
fn pixel_size(size: Size) -> Option<(u32, u32)> {
    let px = size.ceil();
    let limit = f64::from(u32::MAX);
    let valid = |v: f64| v.is_finite() && (1.0..=limit).contains(&v);
    if !valid(px.width) || !valid(px.height) {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Both components are whole numbers within u32 range."
    )]
    Some((px.width as u32, px.height as u32))
}

/// Draw the cache node's children into the bound image of `width` pixels across `world`.
fn draw_subtree(cx: &mut StepCx<'_>, world: Rect, live: PixelTransform, width: u32, clip: Rect) {
    let pixels_per_unit = f64::from(width) / world.width();
    let height = (world.height() * pixels_per_unit).max(0.0);
    let canvas = cx.canvas();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The image height was validated when it was allocated."
    )]
    canvas.begin_frame(width, height as u32, pixels_per_unit);
    canvas.scale(pixels_per_unit, pixels_per_unit);
    canvas.translate(-world.origin().to_vec2());
    canvas.translate(live.offset_f);
    canvas.scale(live.scale.x, live.scale.y);
    cx.draw_children_offscreen(clip);
    cx.canvas().end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use trellis_scene::{CanvasOp, Container, NodeId, RecordingCanvas, Rgba, Scene};

    /// Fills its own box.
    struct Swatch(Rgba);

    impl Widget for Swatch {
        fn draw(&mut self, cx: &mut DrawCx<'_>) {
            let size = cx.rect().size();
            cx.canvas()
                .fill_rect(Rect::from_origin_size(Point::ZERO, size), self.0);
        }
    }

    struct Fixture {
        scene: Scene,
        canvas: RecordingCanvas,
        root: NodeId,
        cache: NodeId,
    }

    /// Root 200x200, cache at (10, 10) sized 50x50, one 20x20 swatch inside.
    fn fixture(config: CacheConfig) -> Fixture {
        let mut scene = Scene::new();
        let root = scene.insert(Container, Rect::new(0.0, 0.0, 200.0, 200.0));
        let cache = scene.insert(RenderCache::with_config(config), Rect::new(10.0, 10.0, 60.0, 60.0));
        let swatch = scene.insert(Swatch([1.0, 0.5, 0.0, 1.0]), Rect::new(0.0, 0.0, 20.0, 20.0));
        scene.add_child(root, cache).unwrap();
        scene.add_child(cache, swatch).unwrap();
        Fixture {
            scene,
            canvas: RecordingCanvas::new(),
            root,
            cache,
        }
    }

    impl Fixture {
        /// One frame: update pass, then draw under `transform`.
        fn frame(&mut self, transform: Affine) {
            self.scene.step(self.root, &mut self.canvas);
            self.canvas.begin_frame(200, 200, 1.0);
            self.canvas.set_transform(transform);
            self.scene.draw(self.root, &mut self.canvas);
            self.canvas.end_frame();
        }

        fn cache(&self) -> &RenderCache {
            self.scene.widget::<RenderCache>(self.cache).unwrap()
        }

        fn blits(&self) -> Vec<Rect> {
            self.canvas
                .ops()
                .iter()
                .filter_map(|op| match op {
                    CanvasOp::DrawImage { quad, .. } => Some(*quad),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn steady_transform_renders_once() {
        let mut f = fixture(CacheConfig::default());
        for _ in 0..5 {
            f.frame(Affine::IDENTITY);
        }
        assert_eq!(
            f.cache().stats(),
            CacheStats {
                allocations: 1,
                renders: 1,
                skipped: 0
            }
        );
        assert_eq!(f.cache().image_size(), Some((20, 20)));
        assert_eq!(f.blits(), vec![Rect::new(10.0, 10.0, 30.0, 30.0); 4]);
        assert_eq!(
            f.canvas
                .count(|op| matches!(op, CanvasOp::FillRect { target: None, .. })),
            0,
            "children are only drawn into the image"
        );
    }

    #[test]
    fn rendered_subtree_lands_in_the_image() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        let image = f.cache().image().unwrap();
        let fills: Vec<_> = f
            .canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                CanvasOp::FillRect {
                    rect,
                    transform,
                    target,
                    ..
                } => Some((*rect, *transform, *target)),
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![(Rect::new(0.0, 0.0, 20.0, 20.0), Affine::IDENTITY, Some(image))]
        );
    }

    #[test]
    fn settled_rescale_renders_once_with_stretched_blits_before() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        assert_eq!(f.cache().stats().renders, 1);
        f.canvas.take_ops();

        // Zoom gesture: the scale changes every frame.
        for s in [1.5, 3.0, 2.5, 2.0] {
            f.frame(Affine::scale(s));
        }
        assert_eq!(f.cache().stats().renders, 1, "no re-render while zooming");
        assert_eq!(
            f.blits().last(),
            Some(&Rect::new(20.0, 20.0, 60.0, 60.0)),
            "old image stretched by the scale ratio"
        );

        // The scale holds: observed twice, rendered once, then steady.
        for _ in 0..4 {
            f.frame(Affine::scale(2.0));
        }
        let cache = f.cache();
        assert_eq!(cache.stats().renders, 2);
        assert_eq!(cache.stats().allocations, 2);
        assert_eq!(cache.image_size(), Some((40, 40)));
        assert_eq!(cache.world_box(), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
        assert_eq!(f.canvas.count(|op| matches!(op, CanvasOp::DeleteImage(_))), 1);
        assert_eq!(f.blits().last(), Some(&Rect::new(20.0, 20.0, 60.0, 60.0)));
    }

    #[test]
    fn subpixel_moves_past_tolerance_rerender() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);

        f.frame(Affine::translate(Vec2::new(0.05, 0.0)));
        f.frame(Affine::translate(Vec2::new(0.05, 0.0)));
        assert_eq!(f.cache().stats().renders, 1, "below tolerance");

        f.frame(Affine::translate(Vec2::new(0.5, 0.0)));
        f.frame(Affine::translate(Vec2::new(0.5, 0.0)));
        assert_eq!(f.cache().stats().renders, 2);
        assert_eq!(f.cache().stats().allocations, 2, "box grew by a pixel");

        // Whole-pixel moves reuse the image as is.
        f.frame(Affine::translate(Vec2::new(7.5, 3.0)));
        f.frame(Affine::translate(Vec2::new(7.5, 3.0)));
        assert_eq!(f.cache().stats().renders, 2);
        assert_eq!(f.blits().last(), Some(&Rect::new(17.0, 13.0, 38.0, 33.0)));
    }

    #[test]
    fn subpixel_tracking_can_be_disabled() {
        let mut f = fixture(CacheConfig {
            dirty_on_subpixel_change: false,
            ..CacheConfig::default()
        });
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        f.frame(Affine::translate(Vec2::new(0.5, 0.5)));
        f.frame(Affine::translate(Vec2::new(0.5, 0.5)));
        assert_eq!(f.cache().stats().renders, 1);
    }

    #[test]
    fn allocation_failure_is_not_retried_every_frame() {
        let mut f = fixture(CacheConfig::default());
        f.canvas.set_fail_allocations(true);
        for _ in 0..4 {
            f.frame(Affine::IDENTITY);
        }
        assert_eq!(
            f.canvas
                .count(|op| matches!(op, CanvasOp::CreateImageFailed { .. })),
            1
        );
        assert_eq!(f.cache().stats().skipped, 1);
        assert!(!f.cache().is_dirty());
        assert!(f.blits().is_empty());

        // A later invalidation succeeds.
        f.canvas.set_fail_allocations(false);
        f.scene.notify(f.root, EventKind::Dirty);
        f.frame(Affine::IDENTITY);
        assert_eq!(f.cache().stats().renders, 1);
        assert_eq!(f.blits().len(), 1);
    }

    #[test]
    fn hidden_children_skip_rendering() {
        let mut f = fixture(CacheConfig::default());
        let swatch = f.scene.children_of(f.cache)[0];
        f.scene.hide(swatch);
        for _ in 0..3 {
            f.frame(Affine::IDENTITY);
        }
        let c = f.cache();
        assert_eq!(c.stats().skipped, 1);
        assert_eq!(c.image(), None);
        assert_eq!(f.canvas.count(|op| matches!(op, CanvasOp::CreateImage { .. })), 0);
    }

    #[test]
    fn oversampled_render_filters_down() {
        let mut f = fixture(CacheConfig {
            oversample: 2.0,
            ..CacheConfig::default()
        });
        f.frame(Affine::IDENTITY);
        f.canvas.take_ops();
        f.scene.step(f.root, &mut f.canvas);
        let image = f.cache().image().unwrap();
        let ops = f.canvas.take_ops();
        let over = match &ops[1] {
            CanvasOp::CreateImage {
                image,
                width: 40,
                height: 40,
            } => *image,
            op => panic!("expected the oversampled allocation, got {op:?}"),
        };
        assert_eq!(
            ops[0],
            CanvasOp::CreateImage {
                image,
                width: 20,
                height: 20
            }
        );
        assert_eq!(
            &ops[2..],
            &[
                CanvasOp::BindImage(Some(over)),
                CanvasOp::BeginFrame {
                    width: 40,
                    height: 40,
                    pixel_ratio: 2.0
                },
                CanvasOp::FillRect {
                    rect: Rect::new(0.0, 0.0, 20.0, 20.0),
                    color: [1.0, 0.5, 0.0, 1.0],
                    transform: Affine::scale(2.0),
                    target: Some(over),
                },
                CanvasOp::EndFrame,
                CanvasOp::BindImage(None),
                CanvasOp::BindImage(Some(image)),
                CanvasOp::BeginFrame {
                    width: 20,
                    height: 20,
                    pixel_ratio: 1.0
                },
                CanvasOp::FilterImage { src: over, dst: image },
                CanvasOp::EndFrame,
                CanvasOp::BindImage(None),
                CanvasOp::DeleteImage(over),
            ]
        );
    }

    #[test]
    fn failed_oversample_allocation_leaves_nothing_to_blit() {
        let mut f = fixture(CacheConfig {
            oversample: 2.0,
            ..CacheConfig::default()
        });
        // The cached image is allocation #1, the oversampled one #2.
        f.canvas.fail_nth_allocation(2);
        for _ in 0..3 {
            f.frame(Affine::IDENTITY);
        }
        assert_eq!(
            f.cache().stats(),
            CacheStats {
                allocations: 1,
                renders: 0,
                skipped: 1
            }
        );
        assert_eq!(f.cache().image(), None);
        assert!(f.blits().is_empty());

        f.scene.notify(f.root, EventKind::Dirty);
        f.frame(Affine::IDENTITY);
        assert_eq!(f.cache().stats().renders, 1);
        assert_eq!(f.blits().len(), 1);
    }

    #[test]
    fn invalid_oversample_drops_a_reused_image() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        let image = f.cache().image().unwrap();
        f.scene
            .widget_mut::<RenderCache>(f.cache)
            .unwrap()
            .set_oversample(0.0);
        f.canvas.take_ops();
        f.frame(Affine::IDENTITY);
        assert_eq!(f.cache().image(), None);
        assert_eq!(f.cache().stats().skipped, 1);
        assert!(f.canvas.ops().contains(&CanvasOp::DeleteImage(image)));
        assert!(f.blits().is_empty());
    }

    #[test]
    fn single_scale_step_rerenders_one_pass_late() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);

        f.frame(Affine::scale(2.0));
        assert!(!f.cache().is_dirty(), "first draw at the new scale only stretches");
        f.frame(Affine::scale(2.0));
        assert!(f.cache().is_dirty());
        assert_eq!(f.cache().stats().renders, 1);
        f.frame(Affine::scale(2.0));
        assert_eq!(f.cache().stats().renders, 2);
    }

    #[test]
    fn context_loss_reallocates() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        f.scene.notify(f.root, EventKind::ContextDestroy);
        assert_eq!(f.cache().image(), None);
        assert!(f.cache().is_dirty());
        f.scene.notify(f.root, EventKind::ContextCreate);
        f.frame(Affine::IDENTITY);
        assert_eq!(f.cache().stats().allocations, 2);
        assert_eq!(f.cache().stats().renders, 2);
    }

    #[test]
    fn destroyed_cache_releases_its_image() {
        let mut f = fixture(CacheConfig::default());
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        let image = f.cache().image().unwrap();
        f.scene.request_delete(f.cache);
        f.scene.step(f.root, &mut f.canvas);
        assert_eq!(
            f.canvas.ops().last(),
            Some(&CanvasOp::DeleteImage(image))
        );
    }

    #[test]
    fn rotation_draws_nothing() {
        let mut f = fixture(CacheConfig::default());
        for _ in 0..3 {
            f.frame(Affine::rotate(0.2));
        }
        assert!(f.blits().is_empty());
        assert_eq!(f.cache().stats(), CacheStats::default());
        assert_eq!(f.canvas.count(|op| matches!(op, CanvasOp::FillRect { .. })), 0);
    }

    #[test]
    fn bypassed_cache_draws_children_directly() {
        let mut f = fixture(CacheConfig {
            bypassed: true,
            ..CacheConfig::default()
        });
        f.frame(Affine::IDENTITY);
        f.frame(Affine::IDENTITY);
        assert_eq!(
            f.canvas
                .count(|op| matches!(op, CanvasOp::FillRect { target: None, .. })),
            2
        );
        assert!(f.blits().is_empty());
        assert_eq!(f.cache().stats(), CacheStats::default());
    }

    #[test]
    fn frame_budget_defers_extra_renders() {
        let config = CacheConfig {
            frame_render_limit: Some(1),
            ..CacheConfig::default()
        };
        let mut scene = Scene::new();
        let mut canvas = RecordingCanvas::new();
        let root = scene.insert(Container, Rect::new(0.0, 0.0, 200.0, 200.0));
        let mut caches = Vec::new();
        for x in [0.0, 100.0] {
            let cache = scene.insert(RenderCache::with_config(config), Rect::new(x, 0.0, x + 50.0, 50.0));
            scene.add_child(root, cache).unwrap();
            caches.push(cache);
        }
        let renders = |scene: &Scene| -> Vec<u32> {
            caches
                .iter()
                .map(|c| scene.widget::<RenderCache>(*c).unwrap().stats().renders)
                .collect()
        };

        scene.draw(root, &mut canvas);
        scene.step(root, &mut canvas);
        assert_eq!(renders(&scene), vec![1, 0]);
        scene.step(root, &mut canvas);
        assert_eq!(renders(&scene), vec![1, 1]);
    }
}
