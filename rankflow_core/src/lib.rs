// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ranking, layout and interaction engine for ranked bump charts.
//!
//! A ranked bump chart shows one column of dots per period. Within a period, every
//! series is ranked by a metric (raw value, growth, or growth rate) and split around a
//! threshold level: members at or above the level stack upward from the level line,
//! members below it stack downward, and (optionally) members that did not change at all
//! are set aside in a separate bucket.
//!
//! The pipeline is:
//! - [`Dataset::ingest`] coerces uniform input rows into a numeric matrix.
//! - [`MetricTable::compute`] derives value, growth and rate per series and period.
//! - [`Ranking::rank_all`] partitions and ranks every period, gathering [`Extents`].
//! - [`ChartLayout::arrange`] sizes markers and aligns the level line across periods.
//! - [`Scales::build`] and [`LegendBuckets::build`] derive positions and colors.
//!
//! [`BumpChart`] runs the whole sequence and exposes a renderer-facing [`Frame`];
//! [`InteractionController`] wraps it with hover, click and level handling.
//!
//! Rendering is out of scope: frames carry geometry (`kurbo`) and colors (`peniko`) and
//! leave drawing to the host.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod chart;
mod color;
mod dataset;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod interaction;
mod layout;
mod legend;
mod metric;
mod options;
#[cfg(test)]
mod pipeline_tests;
mod rank;
mod scale;
mod slider;
mod symbol;
mod ticks;
mod tooltip;

pub use chart::{BumpChart, Frame, Marker, RecordRef, SliderView};
pub use color::Palette;
pub use dataset::{Dataset, Field, Row};
pub use error::IngestError;
pub use format::{format_fixed, format_percent, format_si};
pub use interaction::{
    ChartHandler, DIMMED_OPACITY, Effect, Effects, Event, FocusState, InteractionController,
};
pub use layout::{
    ChartLayout, DotFit, Margins, Shift, ShiftBound, Size, UnchangedLabel, compute_shift,
};
pub use legend::{BUCKET_STRIDE, LegendBucket, LegendBuckets, LegendItem, LegendStrip};
pub use metric::{Metric, MetricPeriod, MetricTable, ValueRecord, growth_rate};
pub use options::{ChartColors, ChartOptions, ClickAction, TooltipStyle};
pub use rank::{
    Extents, RankParams, RankedPeriod, RankedRecord, Ranking, Section, Slot, rank_period,
};
pub use scale::{
    DEFAULT_TICK_COUNT, RankAxisScale, ScaleLinear, ScalePoint, ScaleSequential, Scales,
    SlotScale, UnchangedScale, nice_domain,
};
pub use slider::{SliderRange, level_label};
pub use symbol::Symbol;
pub use ticks::{
    RankTick, TickExtractor, TickInterval, TickSpec, XTick, auto_interval, rank_axis,
    x_axis_ticks,
};
pub use tooltip::{Tooltip, TooltipPlacement};

pub use rankflow_text::{
    FontFamily, FontWeight, HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle,
};
