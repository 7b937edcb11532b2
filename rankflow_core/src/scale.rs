// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position and color scales for the bump chart.
//!
//! All scales are pure functions of the current extents and layout; they are rebuilt
//! whenever either changes.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::Color;

use crate::color::Palette;
use crate::layout::ChartLayout;
use crate::options::ChartOptions;
use crate::rank::Extents;

/// Tick count used when "nicing" color scale domains and listing their ticks.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns “nice-ish” tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Extends `domain` outward to round tick boundaries, keeping its direction.
///
/// Rounding can change the tick increment, so it is repeated until the increment is
/// stable (at most ten passes).
pub fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (a, b) = domain;
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let mut prev = None;
    for _ in 0..10 {
        let Some(inc) = Increment::new(lo, hi, count) else {
            break;
        };
        if prev == Some(inc) {
            break;
        }
        lo = inc.value(inc.index(lo).floor());
        hi = inc.value(inc.index(hi).ceil());
        prev = Some(inc);
    }
    if a <= b { (lo, hi) } else { (hi, lo) }
}

/// Round tick values inside `[min, max]`, ascending.
pub(crate) fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let Some(inc) = Increment::new(min, max, count) else {
        return alloc::vec![min, max];
    };

    let mut i0 = inc.index(min).round();
    let mut i1 = inc.index(max).round();
    if inc.value(i0) < min {
        i0 += 1.0;
    }
    if inc.value(i1) > max {
        i1 -= 1.0;
    }
    let n_f = i1 - i0;
    if !n_f.is_finite() || n_f < 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by finite/non-negative checks and capped at 10k"
    )]
    let n = n_f.min(10_000.0) as u64;
    (0..=n).map(|i| inc.value(i0 + i as f64)).collect()
}

const SQRT_50: f64 = 7.0710678118654755;
const SQRT_10: f64 = 3.1622776601683795;

/// A tick increment of 1, 2 or 5 times a power of ten.
///
/// Sub-unit increments are kept as their (integral) inverse so tick values are computed
/// as `i / inverse` without accumulating error.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Increment {
    Step(f64),
    Inverse(f64),
}

impl Increment {
    fn new(min: f64, max: f64, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let step = (max - min) / count as f64;
        if !step.is_finite() || step <= 0.0 {
            return None;
        }
        let power = step.log10().floor();
        let error = step / 10_f64.powi(power_exponent(power));
        let factor = if error >= SQRT_50 {
            10.0
        } else if error >= SQRT_10 {
            5.0
        } else if error >= core::f64::consts::SQRT_2 {
            2.0
        } else {
            1.0
        };
        let inc = if power < 0.0 {
            Self::Inverse(10_f64.powi(power_exponent(-power)) / factor)
        } else {
            Self::Step(factor * 10_f64.powi(power_exponent(power)))
        };
        Some(inc)
    }

    fn index(self, v: f64) -> f64 {
        match self {
            Self::Step(s) => v / s,
            Self::Inverse(inv) => v * inv,
        }
    }

    fn value(self, i: f64) -> f64 {
        match self {
            Self::Step(s) => i * s,
            Self::Inverse(inv) => i / inv,
        }
    }
}

fn power_exponent(power: f64) -> i32 {
    let e = power.clamp(i32::MIN as f64, i32::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i32 range")]
    {
        e as i32
    }
}

/// A discrete point scale (evenly spaced positions for `count` indices).
///
/// Positions follow the usual point-scale rules: with `padding = 0` the first and last
/// index sit on the range ends, and a single index is centred (`align = 0.5`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePoint {
    range: (f64, f64),
    count: usize,
    padding: f64,
    align: f64,
}

impl ScalePoint {
    /// Creates a new point scale with no outer padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding: 0.0,
            align: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Sets how leftover space is distributed (`0` start, `0.5` centre, `1` end).
    pub fn with_align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self
    }

    /// Returns the number of points.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between adjacent points.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let span = (r1 - r0).abs();
        span / (n - 1.0 + 2.0 * self.padding).max(1.0)
    }

    /// Returns the position of the point at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let span = (r1 - r0).abs();
        let step = self.step();
        let used = step * (self.count.max(1) - 1) as f64;
        let start = r0.min(r1) + (span - used) * self.align;
        if r1 >= r0 {
            start + step * index as f64
        } else {
            // Reversed range: index 0 sits at the high end.
            let last = self.count.max(1) - 1;
            start + step * last.saturating_sub(index) as f64
        }
    }
}

/// Maps an integer dot slot to its vertical offset: `slot × diameter`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotScale {
    /// Height of one dot row.
    pub diameter: f64,
}

impl SlotScale {
    /// Returns the offset of `slot`.
    pub fn map(&self, slot: usize) -> f64 {
        slot as f64 * self.diameter
    }
}

/// The rank axis: a fixed domain `len, …, 0, …, -len` spread over `2·len` dot rows.
///
/// Positive values count dot rows above the level line, negative ones below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankAxisScale {
    /// Number of series.
    pub len: usize,
    /// Height of one dot row.
    pub diameter: f64,
}

impl RankAxisScale {
    /// Tick values are domain members divisible by this.
    pub const TICK_EVERY: i32 = 3;

    fn len_i32(&self) -> i32 {
        i32::try_from(self.len).unwrap_or(i32::MAX)
    }

    /// Maps a domain value to its vertical offset.
    pub fn map(&self, value: i32) -> f64 {
        f64::from(self.len_i32() - value) * self.diameter
    }

    /// The domain, top to bottom.
    pub fn domain(&self) -> impl Iterator<Item = i32> {
        let len = self.len_i32();
        (-len..=len).rev()
    }

    /// Domain values that get a labelled tick.
    pub fn ticks(&self) -> Vec<i32> {
        self.domain().filter(|v| v % Self::TICK_EVERY == 0).collect()
    }

    /// Vertical offset of the level line.
    pub fn zero(&self) -> f64 {
        self.map(0)
    }
}

/// Vertical positions of the unchanged bucket below the ranked column.
///
/// Index 0 (the largest unchanged value) sits lowest; the bucket grows upward toward the
/// two-row gap under the ranked column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnchangedScale {
    /// Top of the bucket.
    pub bottom: f64,
    /// Number of slots (largest unchanged count of any period).
    pub count: usize,
    /// Height of one dot row.
    pub diameter: f64,
}

impl UnchangedScale {
    /// Rows of gap between the ranked column and the bucket.
    pub const GAP_ROWS: usize = 2;

    /// Builds the bucket scale for a layout.
    pub fn for_layout(layout: &ChartLayout) -> Self {
        let d = layout.dot_diameter;
        let len = layout.series_count;
        let shift = layout.shift.max;
        let bottom = if shift.offset == 0 {
            (len + Self::GAP_ROWS) as f64 * d
        } else {
            let data_len = if shift.period.is_some() { len } else { 0 };
            shift.offset as f64 * d + (data_len + Self::GAP_ROWS) as f64 * d
        };
        Self {
            bottom,
            count: layout.max_unchanged_count,
            diameter: d,
        }
    }

    /// Returns the vertical offset of slot `index`.
    pub fn map(&self, index: usize) -> f64 {
        let from_top = self.count as f64 - 1.0 - index as f64;
        self.bottom + from_top.max(0.0) * self.diameter
    }
}

/// A continuous, clamped, sequential color scale.
#[derive(Clone, Debug)]
pub struct ScaleSequential {
    domain: (f64, f64),
    palette: Palette,
    clamp: bool,
}

impl ScaleSequential {
    /// Creates a scale over `domain` (which may be descending).
    pub fn new(domain: (f64, f64), palette: Palette) -> Self {
        Self {
            domain,
            palette,
            clamp: false,
        }
    }

    /// Extends the domain to round bounds.
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = nice_domain(self.domain, count);
        self
    }

    /// Enables or disables clamping of out-of-domain inputs to the nearest endpoint.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Returns the (possibly niced) domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Maps a value to a color. A collapsed domain maps everything to the midpoint.
    pub fn map(&self, x: f64) -> Color {
        let (d0, d1) = self.domain;
        let t = if d0 == d1 { 0.5 } else { (x - d0) / (d1 - d0) };
        let t = if self.clamp { t.clamp(0.0, 1.0) } else { t };
        self.palette.sample(t)
    }

    /// Returns tick values over the domain, ascending.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// The full set of scales for one recompute.
#[derive(Clone, Debug)]
pub struct Scales {
    /// Period index to horizontal position.
    pub x: ScalePoint,
    /// Dot slot to vertical offset within a period column.
    pub slot: SlotScale,
    /// Rank axis labels and level line.
    pub rank: RankAxisScale,
    /// Unchanged bucket slots.
    pub unchanged: UnchangedScale,
    /// Positive partition values to color.
    pub positive: ScaleSequential,
    /// Negative partition values to color (most negative is most saturated).
    pub negative: ScaleSequential,
}

impl Scales {
    /// Builds every scale from the extents and layout.
    pub fn build(
        extents: &Extents,
        layout: &ChartLayout,
        options: &ChartOptions,
        period_count: usize,
    ) -> Self {
        let d = layout.dot_diameter;
        Self {
            x: ScalePoint::new((0.0, layout.plot_width()), period_count),
            slot: SlotScale { diameter: d },
            rank: RankAxisScale {
                len: layout.series_count,
                diameter: d,
            },
            unchanged: UnchangedScale::for_layout(layout),
            positive: ScaleSequential::new(
                (extents.p_min, extents.p_max),
                options.pos_palette.clone(),
            )
            .nice(DEFAULT_TICK_COUNT)
            .with_clamp(true),
            negative: ScaleSequential::new(
                (extents.n_max, extents.n_min),
                options.neg_palette.clone(),
            )
            .nice(DEFAULT_TICK_COUNT)
            .with_clamp(true),
        }
    }
}
