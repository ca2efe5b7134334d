// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Cache: an offscreen render cache widget for Trellis scenes.
//!
//! Wrap an expensive subtree in a [`RenderCache`] node and its children are drawn into an
//! offscreen image once, then blitted on every later frame until something invalidates
//! the image.
//!
//! - Images are pixel-aligned: the canvas transform is split by [`PixelTransform`] into a
//!   scale, a whole-pixel offset and a sub-pixel remainder, and only the remainder is
//!   baked into the image.
//! - Rotated or skewed transforms are rejected ([`TransformError`]) and the node draws
//!   nothing for that frame.
//! - During a zoom the old image is stretched; one re-render happens once the scale has
//!   held for two draws.
//! - Rendering happens in the update pass ([`trellis_scene::Scene::step`]), never while
//!   drawing, and can be limited per frame with [`CacheConfig::frame_render_limit`].
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Affine, Rect};
//! use trellis_cache::RenderCache;
//! use trellis_scene::{Canvas, Container, RecordingCanvas, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(Container, Rect::new(0.0, 0.0, 100.0, 100.0));
//! let cache = scene.insert(RenderCache::new(), Rect::new(0.0, 0.0, 40.0, 30.0));
//! scene.add_child(root, cache).unwrap();
//!
//! let mut canvas = RecordingCanvas::new();
//! for _ in 0..3 {
//!     scene.step(root, &mut canvas);
//!     canvas.begin_frame(100, 100, 1.0);
//!     scene.draw(root, &mut canvas);
//!     canvas.end_frame();
//! }
//!
//! let cache = scene.widget::<RenderCache>(cache).unwrap();
//! assert_eq!(cache.image_size(), Some((40, 30)));
//! assert_eq!(cache.stats().renders, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod transform;

pub use cache::{CacheConfig, CacheStats, RenderCache};
pub use transform::{PixelTransform, TransformError};
