// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis ticks: period labels along the top and rank labels on the left.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Line, Point};
use peniko::Color;
use peniko::color::palette::css;
use rankflow_text::{TextMeasurer, TextStyle};

use crate::layout::ChartLayout;
use crate::rank::Ranking;
use crate::scale::{RankAxisScale, ScalePoint};

/// A label transform applied to every period tick.
pub type TickExtractor = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How many periods lie between labelled ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickInterval {
    /// Derived from the widest label so labels never overlap.
    #[default]
    Auto,
    /// Label every `n`-th period (`0` is treated as `1`).
    Every(usize),
}

/// Period tick configuration.
#[derive(Clone)]
pub struct TickSpec {
    /// Name of the tick field in the input rows (empty: first column).
    pub name: String,
    /// Whether tick labels are dates; carried to the renderer untouched.
    pub is_date: bool,
    /// Date/number format string; carried to the renderer untouched.
    pub format: String,
    /// Label spacing.
    pub interval: TickInterval,
    /// Optional label transform.
    pub extractor: Option<TickExtractor>,
    /// Tick label and guide line color.
    pub color: Color,
}

impl core::fmt::Debug for TickSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickSpec")
            .field("name", &self.name)
            .field("is_date", &self.is_date)
            .field("format", &self.format)
            .field("interval", &self.interval)
            .field("extractor", &self.extractor.as_ref().map(|_| "<fn>"))
            .field("color", &self.color)
            .finish()
    }
}

impl Default for TickSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_date: false,
            format: String::new(),
            interval: TickInterval::Auto,
            extractor: None,
            color: css::BLACK,
        }
    }
}

impl TickSpec {
    /// Sets the tick field name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks tick labels as dates with a renderer-specific format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.is_date = true;
        self.format = format.into();
        self
    }

    /// Sets the tick interval.
    pub fn with_interval(mut self, interval: TickInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the label transform.
    pub fn with_extractor(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.extractor = Some(Arc::new(f));
        self
    }

    /// Sets the tick color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns the display label for a raw tick value.
    pub fn label(&self, tick: &str) -> String {
        match &self.extractor {
            Some(f) => f(tick),
            None => tick.to_string(),
        }
    }
}

/// A labelled period tick.
#[derive(Clone, Debug, PartialEq)]
pub struct XTick {
    /// Period position.
    pub period: usize,
    /// Display label.
    pub label: String,
    /// Text anchor (start-aligned, hanging below the top edge of the plot).
    pub anchor: Point,
    /// Dashed guide line from the top of the plot down the full column height.
    pub guide: Line,
}

/// Label offset from the guide line.
const X_LABEL_DX: f64 = 3.0;

/// Number of periods between labelled ticks for `Auto`.
///
/// Enough room is left for every label to be followed by a label-sized gap.
pub fn auto_interval(period_count: usize, span: f64, max_label_width: f64) -> usize {
    let c = (span / max_label_width / 2.0).floor();
    let n = period_count as f64;
    let every = if c.is_nan() || c.is_infinite() {
        1.0
    } else if c < 1.0 {
        n
    } else {
        (n / c).ceil()
    };
    #[allow(
        clippy::cast_possible_truncation,
        reason = "bounded by the period count"
    )]
    {
        every.clamp(1.0, n.max(1.0)) as usize
    }
}

/// Builds the period ticks.
pub fn x_axis_ticks(
    ranking: &Ranking,
    layout: &ChartLayout,
    x: &ScalePoint,
    spec: &TickSpec,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
) -> Vec<XTick> {
    let every = match spec.interval {
        TickInterval::Every(n) => n.max(1),
        TickInterval::Auto => {
            let max_width = ranking
                .periods
                .iter()
                .map(|p| measurer.width(&p.tick, style))
                .fold(0.0, f64::max);
            let (r0, r1) = x.range();
            auto_interval(ranking.periods.len(), r1 - r0, max_width)
        }
    };
    let top = layout.margins.legend_height;
    let x0 = layout.margins.left_margin - 2.0 * layout.dot_radius;
    ranking
        .periods
        .iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0)
        .map(|(i, p)| {
            let gx = x0 + x.x(i);
            XTick {
                period: i,
                label: spec.label(&p.tick),
                anchor: Point::new(gx + X_LABEL_DX, top),
                guide: Line::new((gx, top), (gx, top + layout.max_y)),
            }
        })
        .collect()
}

/// A labelled rank-axis tick.
#[derive(Clone, Debug, PartialEq)]
pub struct RankTick {
    /// Axis value (dot rows above the level line).
    pub value: i32,
    /// Display label.
    pub label: String,
    /// Right end of the tick line; labels are end-anchored left of it.
    pub anchor: Point,
}

/// Builds the rank-axis ticks and the dashed level line.
///
/// The level line is omitted when it would sit at the very top of the plot.
pub fn rank_axis(layout: &ChartLayout, scale: &RankAxisScale) -> (Vec<RankTick>, Option<Line>) {
    let r = layout.dot_radius;
    let x = layout.margins.left_margin - 2.0 * r;
    let top = layout.margins.legend_height + layout.margins.inner_margin - r;
    let ticks = scale
        .ticks()
        .into_iter()
        .map(|value| RankTick {
            value,
            label: value.to_string(),
            anchor: Point::new(x, top + scale.map(value)),
        })
        .collect();

    let y = scale.zero() + layout.margins.inner_margin - r;
    let zero = (y != 0.0 && !y.is_nan()).then(|| {
        let y = layout.margins.legend_height + y;
        Line::new((x, y), (layout.margins.left_margin + layout.plot_width(), y))
    });
    (ticks, zero)
}
