// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform zoom of the render wrapper.

use kurbo::Affine;
use serde::{Deserialize, Serialize};

/// Bounds and step size for [`ZoomScale`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    /// Smallest scale.
    pub min: f64,
    /// Largest scale.
    pub max: f64,
    /// Change per wheel notch.
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 5.0,
            step: 0.1,
        }
    }
}

impl ZoomLimits {
    /// Clamp `value` into `[min, max]`.
    ///
    /// Inverted bounds are treated as if swapped, and a NaN value becomes 1.0
    /// before clamping; this never panics.
    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let value = if value.is_nan() { 1.0 } else { value };
        value.max(lo).min(hi)
    }
}

/// A uniform scale factor applied to the render wrapper.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct ZoomScale(f64);

impl Default for ZoomScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomScale {
    /// No zoom.
    pub const IDENTITY: Self = Self(1.0);

    /// A scale clamped into `limits`.
    pub fn new(value: f64, limits: &ZoomLimits) -> Self {
        Self(round(limits.clamp(value)))
    }

    /// The scale factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// The scale after `steps` notches (positive zooms in), clamped.
    #[must_use]
    pub fn stepped(self, steps: i32, limits: &ZoomLimits) -> Self {
        Self::new(self.0 + f64::from(steps) * limits.step, limits)
    }

    /// The transform applied to the render wrapper.
    pub fn to_affine(self) -> Affine {
        Affine::scale(self.0)
    }
}

/// Snap to a fixed decimal grid so repeated steps do not accumulate drift.
fn round(value: f64) -> f64 {
    const GRID: f64 = 1e6;
    (value * GRID).round() / GRID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_do_not_drift() {
        let limits = ZoomLimits::default();
        let mut z = ZoomScale::IDENTITY;
        for _ in 0..3 {
            z = z.stepped(1, &limits);
        }
        assert_eq!(z.get(), 1.3);
        for _ in 0..3 {
            z = z.stepped(-1, &limits);
        }
        assert_eq!(z, ZoomScale::IDENTITY);
    }

    #[test]
    fn clamped_at_both_ends() {
        let limits = ZoomLimits::default();
        let mut z = ZoomScale::IDENTITY;
        for _ in 0..100 {
            z = z.stepped(1, &limits);
        }
        assert_eq!(z.get(), 5.0);
        for _ in 0..100 {
            z = z.stepped(-1, &limits);
        }
        assert_eq!(z.get(), 0.2);
        assert_eq!(ZoomScale::new(-3.0, &limits).get(), 0.2);
        assert_eq!(ZoomScale::new(f64::INFINITY, &limits).get(), 5.0);
        assert_eq!(ZoomScale::new(f64::NAN, &limits).get(), 1.0);
    }

    #[test]
    fn inverted_limits_do_not_panic() {
        let limits = ZoomLimits {
            min: 3.0,
            max: 0.5,
            step: 0.1,
        };
        assert_eq!(ZoomScale::new(10.0, &limits).get(), 3.0);
        assert_eq!(ZoomScale::new(0.1, &limits).get(), 0.5);
    }

    #[test]
    fn affine_is_uniform_scale() {
        let limits = ZoomLimits::default();
        let a = ZoomScale::new(1.5, &limits).to_affine();
        assert_eq!(a, Affine::scale(1.5));
    }
}
