// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous color palettes.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::Color;

/// ColorBrewer `YlGnBu` (9 classes), light to dark.
const YL_GN_BU: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xd9],
    [0xed, 0xf8, 0xb1],
    [0xc7, 0xe9, 0xb4],
    [0x7f, 0xcd, 0xbb],
    [0x41, 0xb6, 0xc4],
    [0x1d, 0x91, 0xc0],
    [0x22, 0x5e, 0xa8],
    [0x25, 0x34, 0x94],
    [0x08, 0x1d, 0x58],
];

/// ColorBrewer `YlOrRd` (9 classes), light to dark.
const YL_OR_RD: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xcc],
    [0xff, 0xed, 0xa0],
    [0xfe, 0xd9, 0x76],
    [0xfe, 0xb2, 0x4c],
    [0xfd, 0x8d, 0x3c],
    [0xfc, 0x4e, 0x2a],
    [0xe3, 0x1a, 0x1c],
    [0xbd, 0x00, 0x26],
    [0x80, 0x00, 0x26],
];

/// A continuous color function over `t` in `[0, 1]`.
#[derive(Clone)]
pub enum Palette {
    /// Piecewise-linear interpolation between evenly spaced sRGB stops.
    Stops(Arc<[Color]>),
    /// An arbitrary interpolator.
    Custom(Arc<dyn Fn(f64) -> Color + Send + Sync>),
}

impl core::fmt::Debug for Palette {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stops(stops) => f.debug_tuple("Stops").field(&stops.len()).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}

impl Palette {
    /// Creates a palette from stops; an empty list samples as transparent.
    pub fn new(stops: impl Into<Vec<Color>>) -> Self {
        Self::Stops(stops.into().into())
    }

    /// Creates a palette from an interpolator function.
    pub fn from_fn(f: impl Fn(f64) -> Color + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Yellow, green, blue. The default palette for the positive partition.
    pub fn yl_gn_bu() -> Self {
        Self::from_rgb8(&YL_GN_BU)
    }

    /// Yellow, orange, red. The default palette for the negative partition.
    pub fn yl_or_rd() -> Self {
        Self::from_rgb8(&YL_OR_RD)
    }

    fn from_rgb8(stops: &[[u8; 3]]) -> Self {
        Self::new(
            stops
                .iter()
                .map(|[r, g, b]| Color::from_rgba8(*r, *g, *b, 255))
                .collect::<Vec<_>>(),
        )
    }

    /// Samples the palette. `t` is clamped to `[0, 1]`; `NaN` samples the start.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Custom(f) => f(t),
            Self::Stops(stops) => match stops.len() {
                0 => Color::TRANSPARENT,
                1 => stops[0],
                n => {
                    let x = t * (n - 1) as f64;
                    let i = {
                        let i = x.floor().min((n - 2) as f64);
                        #[allow(
                            clippy::cast_possible_truncation,
                            reason = "clamped to the stop index range"
                        )]
                        {
                            i as usize
                        }
                    };
                    lerp(stops[i], stops[i + 1], x - i as f64)
                }
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::yl_gn_bu()
    }
}

fn lerp(a: Color, b: Color, t: f64) -> Color {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "color components are f32; t is in [0, 1]"
    )]
    let t = t as f32;
    let mut out = [0.0_f32; 4];
    for (i, c) in out.iter_mut().enumerate() {
        *c = a.components[i] + (b.components[i] - a.components[i]) * t;
    }
    Color::new(out)
}
