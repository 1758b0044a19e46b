// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves and interpolation helpers.
//!
//! Every curve maps progress in `[0, 1]` to eased progress in `[0, 1]`,
//! with `f(0) = 0`, `f(1) = 1` and no decreasing stretch. Inputs outside
//! the unit interval are clamped first.

use serde::{Deserialize, Serialize};

/// Named easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Easing {
    /// `f(t) = t`
    #[default]
    Linear,
    /// `f(t) = t^3`
    InCubic,
    /// `f(t) = 1 - (1 - t)^3`
    OutCubic,
    /// Cubic in the first half, cubic out in the second
    InOutCubic,
}

impl Easing {
    /// All curves, in declaration order
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
    ];

    /// Remap `t` through this curve
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => linear(t),
            Self::InCubic => ease_in_cubic(t),
            Self::OutCubic => ease_out_cubic(t),
            Self::InOutCubic => ease_in_out_cubic(t),
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InCubic => "Ease In (Cubic)",
            Self::OutCubic => "Ease Out (Cubic)",
            Self::InOutCubic => "Ease In-Out (Cubic)",
        }
    }
}

/// Linear (no easing)
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in: slow start, fast finish
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out: fast start, slow finish
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out, symmetric about `t = 0.5`
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }
}
