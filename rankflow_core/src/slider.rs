// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The vertical level slider on the left edge.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use crate::format::{format_fixed, format_percent};
use crate::layout::ChartLayout;
use crate::metric::Metric;
use crate::rank::Extents;

/// Value range and geometry of the level slider.
///
/// The range is taken from the extents of the first render and kept for the lifetime of
/// the chart, so dragging the level does not rescale the slider under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    /// Lowest selectable level.
    pub min: f64,
    /// Highest selectable level.
    pub max: f64,
    /// Increment.
    pub step: f64,
}

impl SliderRange {
    /// Width of the slider track.
    pub const TRACK_WIDTH: f64 = 20.0;
    /// Widening factor applied to the extents.
    pub const HEADROOM: f64 = 1.01;

    /// Derives the range from ranking extents, widened slightly on both ends.
    pub fn from_extents(extents: &Extents) -> Self {
        let min = if extents.n_min > 0.0 {
            extents.n_min / Self::HEADROOM
        } else {
            extents.n_min * Self::HEADROOM
        };
        let max = extents.p_max * Self::HEADROOM;
        Self {
            min,
            max,
            step: min.abs() / 100.0,
        }
    }

    /// Clamps a level into the range.
    pub fn clamp(&self, v: f64) -> f64 {
        if self.min <= self.max {
            v.clamp(self.min, self.max)
        } else {
            v
        }
    }

    /// Track rectangle: one dot row per series on each side of the level line.
    pub fn track(&self, layout: &ChartLayout) -> Rect {
        let (top, height) = Self::span(layout);
        let x = layout.margins.char_height;
        Rect::new(x, top, x + Self::TRACK_WIDTH, top + height + 2.0)
    }

    /// Vertical position of the value label along the track.
    ///
    /// `half_label` is half the label length; the label is rotated, so it extends that far
    /// above and below the returned position and is kept inside the track.
    pub fn label_offset(&self, v: f64, layout: &ChartLayout, half_label: f64) -> f64 {
        let (top, height) = Self::span(layout);
        let range = self.max - self.min;
        if !(range.is_finite() && range > 0.0) {
            return top + height / 2.0;
        }
        let p = (self.max - v).abs();
        let ty = height - p / range * height + top;
        if ty + half_label - top > height {
            height - half_label + top
        } else if ty - half_label - top <= 0.0 {
            half_label + top
        } else {
            ty
        }
    }

    fn span(layout: &ChartLayout) -> (f64, f64) {
        let top =
            layout.margins.legend_height + layout.margins.inner_margin - layout.dot_radius;
        let height = layout.series_count as f64 * 2.0 * layout.dot_diameter;
        (top, height)
    }
}

/// Label shown next to the slider, e.g. `Growth < 5`.
pub fn level_label(metric: Metric, v: f64) -> String {
    match metric {
        Metric::Value => format!("Number < {}", format_fixed(v, 0)),
        Metric::Growth => format!("Growth < {}", format_fixed(v, 0)),
        Metric::Rate => format!("Growth Rate < {}%", format_percent(v, 2)),
    }
}
