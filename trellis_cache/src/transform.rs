// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a canvas transform into scale and pixel offsets.

use kurbo::{Affine, Vec2};

/// Coefficients closer to zero than this count as zero when checking for skew.
const SKEW_EPSILON: f64 = 1e-6;

/// Reasons a transform cannot be cached as an axis-aligned image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The transform rotates or skews.
    #[error("skew and rotation are not supported")]
    Skewed,
    /// A coefficient is NaN or infinite.
    #[error("transform has non-finite coefficients")]
    NonFinite,
    /// A scale factor is zero or negative.
    #[error("transform scale is zero or negative")]
    DegenerateScale,
}

/// An axis-aligned transform split for pixel-exact caching.
///
/// `offset_i + offset_f` is the translation, with `offset_i` integral and each component
/// of `offset_f` in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelTransform {
    /// Per-axis scale.
    pub scale: Vec2,
    /// Whole-pixel part of the translation.
    pub offset_i: Vec2,
    /// Sub-pixel remainder of the translation.
    pub offset_f: Vec2,
}

impl PixelTransform {
    /// Split `transform`, rejecting anything that is not a positive scale plus translation.
    pub fn decompose(transform: Affine) -> Result<Self, TransformError> {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        if !transform.is_finite() {
            return Err(TransformError::NonFinite);
        }
        let near_zero = |v: f64| (-SKEW_EPSILON..=SKEW_EPSILON).contains(&v);
        if !near_zero(b) || !near_zero(c) {
            return Err(TransformError::Skewed);
        }
        if a <= 0.0 || d <= 0.0 {
            return Err(TransformError::DegenerateScale);
        }
        let offset = Vec2::new(e, f);
        let offset_i = offset.floor();
        Ok(Self {
            scale: Vec2::new(a, d),
            offset_i,
            offset_f: offset - offset_i,
        })
    }
}
