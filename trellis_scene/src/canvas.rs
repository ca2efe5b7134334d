// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics backend seam.
//!
//! The scene never talks to a GPU API directly. Everything it needs from the backend is
//! the [`Canvas`] trait: a transform stack, frame bracketing, opaque offscreen images,
//! arbitrary draw commands against the bound target, and an image-to-quad blit.
//!
//! Binding an offscreen image switches the canvas to a separate drawing state (identity
//! transform, empty save stack); unbinding restores the main target's state.
//!
//! [`RecordingCanvas`] is a headless backend that records every call. It is used by the
//! tests, demos and benches in this workspace.

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Vec2};

/// Opaque handle of an offscreen image owned by the backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ImageId(pub u64);

/// Linear RGBA color with components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Errors reported by a graphics backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// The backend could not allocate an offscreen image.
    #[error("offscreen image of {width}x{height} pixels could not be allocated")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The graphics context is gone.
    #[error("graphics context lost")]
    ContextLost,
}

/// Drawing surface supplied by the embedding application.
pub trait Canvas {
    /// Current transform from local to target pixel space.
    fn transform(&self) -> Affine;
    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);
    /// Push the drawing state.
    fn save(&mut self);
    /// Pop the drawing state.
    fn restore(&mut self);

    /// Translate in local space.
    fn translate(&mut self, by: Vec2) {
        let t = self.transform();
        self.set_transform(t * Affine::translate(by));
    }

    /// Scale in local space.
    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform();
        self.set_transform(t * Affine::scale_non_uniform(sx, sy));
    }

    /// Ratio of target pixels to logical units.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Fill a rectangle in local space on the bound target.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Begin a frame of `width` x `height` pixels on the bound target.
    fn begin_frame(&mut self, width: u32, height: u32, pixel_ratio: f64);
    /// Flush the frame started by [`Canvas::begin_frame`].
    fn end_frame(&mut self);

    /// Allocate an offscreen image.
    fn create_image(&mut self, width: u32, height: u32) -> Result<ImageId, CanvasError>;
    /// Release an offscreen image.
    fn delete_image(&mut self, image: ImageId);
    /// Direct drawing into `image`, or back to the main target with `None`.
    fn bind_image(&mut self, image: Option<ImageId>);
    /// Filter `src` down into `dst` (mipmapped minification), used for oversampling.
    fn filter_image(&mut self, src: ImageId, dst: ImageId);
    /// Paint `image` stretched over `quad`, mapped by `transform`.
    ///
    /// The current canvas transform is ignored; `transform` maps `quad` to target pixels.
    fn draw_image(&mut self, image: ImageId, quad: Rect, transform: Affine);
}

/// One recorded [`Canvas`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    /// [`Canvas::fill_rect`], with the transform in effect and the bound target.
    FillRect {
        /// Local rectangle.
        rect: Rect,
        /// Fill color.
        color: Rgba,
        /// Transform in effect.
        transform: Affine,
        /// Bound offscreen image, `None` for the main target.
        target: Option<ImageId>,
    },
    /// [`Canvas::begin_frame`].
    BeginFrame {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Pixel ratio.
        pixel_ratio: f64,
    },
    /// [`Canvas::end_frame`].
    EndFrame,
    /// Successful [`Canvas::create_image`].
    CreateImage {
        /// New handle.
        image: ImageId,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Failed [`Canvas::create_image`].
    CreateImageFailed {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// [`Canvas::delete_image`].
    DeleteImage(ImageId),
    /// [`Canvas::bind_image`].
    BindImage(Option<ImageId>),
    /// [`Canvas::filter_image`].
    FilterImage {
        /// Source image.
        src: ImageId,
        /// Destination image.
        dst: ImageId,
    },
    /// [`Canvas::draw_image`].
    DrawImage {
        /// Image painted.
        image: ImageId,
        /// Destination quad.
        quad: Rect,
        /// Quad transform.
        transform: Affine,
        /// Bound offscreen image, `None` for the main target.
        target: Option<ImageId>,
    },
}

/// Headless [`Canvas`] that records every call.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
    transform: Affine,
    stack: Vec<Affine>,
    // Main target state parked while an offscreen image is bound.
    parked: Option<(Affine, Vec<Affine>)>,
    bound: Option<ImageId>,
    next_image: u64,
    pixel_ratio: f64,
    fail_allocations: bool,
    // Allocations left before the one that fails.
    fail_countdown: Option<u32>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    /// Create a recorder with pixel ratio 1.
    pub fn new() -> Self {
        Self::with_pixel_ratio(1.0)
    }

    /// Create a recorder reporting `pixel_ratio`.
    pub fn with_pixel_ratio(pixel_ratio: f64) -> Self {
        Self {
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            parked: None,
            bound: None,
            next_image: 1,
            pixel_ratio,
            fail_allocations: false,
            fail_countdown: None,
        }
    }

    /// Make every subsequent [`Canvas::create_image`] fail.
    pub fn set_fail_allocations(&mut self, fail: bool) {
        self.fail_allocations = fail;
    }

    /// Make only the `n`th subsequent [`Canvas::create_image`] fail, counting from 1.
    pub fn fail_nth_allocation(&mut self, n: u32) {
        self.fail_countdown = (n > 0).then_some(n);
    }

    /// Change the reported pixel ratio.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Recorded calls, oldest first.
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Drain the recorded calls.
    pub fn take_ops(&mut self) -> Vec<CanvasOp> {
        core::mem::take(&mut self.ops)
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&CanvasOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Currently bound offscreen image.
    pub fn bound_image(&self) -> Option<ImageId> {
        self.bound
    }
}

impl Canvas for RecordingCanvas {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(CanvasOp::FillRect {
            rect,
            color,
            transform: self.transform,
            target: self.bound,
        });
    }

    fn begin_frame(&mut self, width: u32, height: u32, pixel_ratio: f64) {
        self.transform = Affine::IDENTITY;
        self.stack.clear();
        self.ops.push(CanvasOp::BeginFrame {
            width,
            height,
            pixel_ratio,
        });
    }

    fn end_frame(&mut self) {
        self.ops.push(CanvasOp::EndFrame);
    }

    fn create_image(&mut self, width: u32, height: u32) -> Result<ImageId, CanvasError> {
        let fail_now = match self.fail_countdown {
            Some(1) => {
                self.fail_countdown = None;
                true
            }
            Some(n) => {
                self.fail_countdown = Some(n - 1);
                false
            }
            None => false,
        };
        if self.fail_allocations || fail_now {
            self.ops.push(CanvasOp::CreateImageFailed { width, height });
            return Err(CanvasError::Allocation { width, height });
        }
        let image = ImageId(self.next_image);
        self.next_image += 1;
        self.ops.push(CanvasOp::CreateImage {
            image,
            width,
            height,
        });
        Ok(image)
    }

    fn delete_image(&mut self, image: ImageId) {
        self.ops.push(CanvasOp::DeleteImage(image));
    }

    fn bind_image(&mut self, image: Option<ImageId>) {
        match (self.bound, image) {
            (None, Some(_)) => {
                let main = (self.transform, core::mem::take(&mut self.stack));
                self.parked = Some(main);
                self.transform = Affine::IDENTITY;
            }
            (Some(_), None) => {
                if let Some((transform, stack)) = self.parked.take() {
                    self.transform = transform;
                    self.stack = stack;
                }
            }
            _ => {}
        }
        self.bound = image;
        self.ops.push(CanvasOp::BindImage(image));
    }

    fn filter_image(&mut self, src: ImageId, dst: ImageId) {
        self.ops.push(CanvasOp::FilterImage { src, dst });
    }

    fn draw_image(&mut self, image: ImageId, quad: Rect, transform: Affine) {
        self.ops.push(CanvasOp::DrawImage {
            image,
            quad,
            transform,
            target: self.bound,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_and_translate() {
        let mut c = RecordingCanvas::new();
        c.save();
        c.translate(Vec2::new(10.0, 5.0));
        c.scale(2.0, 2.0);
        assert_eq!(
            c.transform(),
            Affine::translate(Vec2::new(10.0, 5.0)) * Affine::scale(2.0)
        );
        c.restore();
        assert_eq!(c.transform(), Affine::IDENTITY);
    }

    #[test]
    fn binding_parks_main_state() {
        let mut c = RecordingCanvas::new();
        c.translate(Vec2::new(3.0, 4.0));
        c.save();
        let img = c.create_image(8, 8).unwrap();
        c.bind_image(Some(img));
        assert_eq!(c.transform(), Affine::IDENTITY);
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [1.0; 4]);
        c.bind_image(None);
        assert_eq!(c.transform(), Affine::translate(Vec2::new(3.0, 4.0)));
        c.restore();
        assert!(matches!(
            c.ops().last(),
            Some(CanvasOp::BindImage(None))
        ));
        assert_eq!(
            c.count(|op| matches!(op, CanvasOp::FillRect { target: Some(t), .. } if *t == img)),
            1
        );
    }

    #[test]
    fn failing_allocations_are_recorded() {
        let mut c = RecordingCanvas::new();
        c.set_fail_allocations(true);
        assert_eq!(
            c.create_image(4, 2),
            Err(CanvasError::Allocation {
                width: 4,
                height: 2
            })
        );
        assert_eq!(
            c.ops(),
            &[CanvasOp::CreateImageFailed {
                width: 4,
                height: 2
            }]
        );
    }

    #[test]
    fn only_the_nth_allocation_fails() {
        let mut c = RecordingCanvas::new();
        c.fail_nth_allocation(2);
        assert!(c.create_image(1, 1).is_ok());
        assert!(c.create_image(2, 2).is_err());
        assert!(c.create_image(3, 3).is_ok());
        assert_eq!(
            c.count(|op| matches!(op, CanvasOp::CreateImageFailed { .. })),
            1
        );
    }
}
