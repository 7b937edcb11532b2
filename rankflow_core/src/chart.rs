// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bump chart pipeline and its renderer-facing output.
//!
//! [`BumpChart`] owns the ingested metrics and configuration. Every level change runs the
//! full recompute sequence (rank, layout, scales, legend) from zeroed extents and
//! replaces the current [`Frame`]. Nothing is patched incrementally, so the same inputs
//! always produce the same frame.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect};
use peniko::Color;
use rankflow_text::TextMeasurer;

use crate::dataset::{Dataset, Row};
use crate::error::IngestError;
use crate::layout::{ChartLayout, Margins, Size, UnchangedLabel};
use crate::legend::{LegendBuckets, LegendStrip};
use crate::metric::{Metric, MetricTable};
use crate::options::ChartOptions;
use crate::rank::{RankParams, RankedRecord, Ranking, Section, Slot};
use crate::scale::Scales;
use crate::slider::{SliderRange, level_label};
use crate::ticks::{RankTick, XTick, rank_axis, x_axis_ticks};

/// Identifies a record by period position (index into [`Ranking::periods`]) and series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordRef {
    /// Period position.
    pub period: usize,
    /// Series index.
    pub series: usize,
}

impl RecordRef {
    /// Creates a new reference.
    pub fn new(period: usize, series: usize) -> Self {
        Self { period, series }
    }
}

/// A positioned marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// The record drawn.
    pub record: RecordRef,
    /// Marker center.
    pub center: Point,
    /// Marker radius.
    pub radius: f64,
    /// Fill color.
    pub fill: Color,
    /// Partition the marker belongs to.
    pub section: Section,
    /// Active metric value of the record.
    pub value: f64,
}

impl Marker {
    /// Whether `p` lies within the marker's circle.
    pub fn hit(&self, p: Point) -> bool {
        (p - self.center).hypot2() <= self.radius * self.radius
    }
}

/// Slider state for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderView {
    /// Range fixed at the first render.
    pub range: SliderRange,
    /// Track rectangle.
    pub track: Rect,
    /// Current level text.
    pub label: String,
    /// Label center along the track.
    pub label_y: f64,
}

/// Everything a renderer needs for one recompute.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Level the frame was computed at.
    pub level: f64,
    /// Ranked periods and extents.
    pub ranking: Ranking,
    /// Arranged layout (radius, shift, `max_y`).
    pub layout: ChartLayout,
    /// Position and color scales.
    pub scales: Scales,
    /// Legend buckets.
    pub legend: LegendBuckets,
    /// Positioned legend strip.
    pub legend_strip: LegendStrip,
    /// Rank-axis ticks.
    pub rank_ticks: Vec<RankTick>,
    /// Dashed level line, if visible.
    pub zero_line: Option<Line>,
    /// Period ticks.
    pub x_ticks: Vec<XTick>,
    /// "Unchanged" label placement.
    pub unchanged_label: Option<UnchangedLabel>,
    /// Slider, when shown.
    pub slider: Option<SliderView>,
    /// Every drawn marker, period by period in sorted record order.
    pub markers: Vec<Marker>,
    /// Canvas outline when debugging.
    pub debug_bounds: Option<Rect>,
}

impl Frame {
    /// Looks up a ranked record.
    pub fn record(&self, r: RecordRef) -> Option<&RankedRecord> {
        self.ranking.record(r.period, r.series)
    }

    /// Looks up the marker of a record.
    pub fn marker(&self, r: RecordRef) -> Option<&Marker> {
        self.markers.iter().find(|m| m.record == r)
    }

    /// Returns the topmost marker under `p`.
    pub fn marker_at(&self, p: Point) -> Option<&Marker> {
        self.markers.iter().rev().find(|m| m.hit(p))
    }

    /// Horizontal center of a period column.
    pub fn column_x(&self, period: usize) -> f64 {
        self.layout.plot_origin().x + self.scales.x.x(period)
    }

    /// Highlighter rectangle of a period column.
    pub fn column_rect(&self, period: usize) -> Rect {
        self.layout.column_rect(self.column_x(period))
    }

    /// Period column under `p`, if any.
    pub fn column_at(&self, p: Point) -> Option<usize> {
        (0..self.ranking.periods.len()).find(|&i| self.column_rect(i).contains(p))
    }
}

/// Inputs that stay fixed across recomputes.
#[derive(Debug)]
struct Pipeline<M> {
    measurer: M,
    options: ChartOptions,
    size: Size,
    margins: Margins,
    table: MetricTable,
}

impl<M: TextMeasurer> Pipeline<M> {
    /// Runs the recompute sequence. A missing slider range is captured from this ranking.
    fn frame(&self, level: f64, slider: Option<SliderRange>) -> Frame {
        let options = &self.options;
        let params = RankParams {
            metric: options.metric,
            level,
            isolate_unchanged: options.isolate_unchanged,
        };
        let ranking = Ranking::rank_all(&self.table, &params);
        let layout = ChartLayout::arrange(&ranking, self.size, self.margins);
        let scales = Scales::build(&ranking.extents, &layout, options, ranking.periods.len());
        let legend = LegendBuckets::build(&scales, level, options.metric, ranking.extents.p_max);
        let legend_strip = legend.strip(&self.measurer, &options.text_style, self.size.width);
        let (rank_ticks, zero_line) = rank_axis(&layout, &scales.rank);
        let x_ticks = x_axis_ticks(
            &ranking,
            &layout,
            &scales.x,
            &options.tick,
            &self.measurer,
            &options.text_style,
        );
        let markers = markers(&ranking, &layout, &scales, options);

        let slider = slider
            .or_else(|| {
                options
                    .show_slider
                    .then(|| SliderRange::from_extents(&ranking.extents))
            })
            .map(|range| {
                let label = level_label(options.metric, level);
                let half = self.measurer.width(&label, &options.text_style) / 2.0;
                SliderView {
                    range,
                    track: range.track(&layout),
                    label_y: range.label_offset(level, &layout, half),
                    label,
                }
            });

        log::debug!(
            "recompute at level {level}: radius {}, max_y {}, {} markers, {} legend buckets",
            layout.dot_radius,
            layout.max_y,
            markers.len(),
            legend.len()
        );

        Frame {
            level,
            unchanged_label: layout.unchanged_label(),
            debug_bounds: options
                .debug
                .then(|| Rect::new(0.0, 0.0, self.size.width, self.size.height)),
            ranking,
            layout,
            scales,
            legend,
            legend_strip,
            rank_ticks,
            zero_line,
            x_ticks,
            slider,
            markers,
        }
    }
}

fn markers(
    ranking: &Ranking,
    layout: &ChartLayout,
    scales: &Scales,
    options: &ChartOptions,
) -> Vec<Marker> {
    let metric = ranking.params.metric;
    let x0 = layout.plot_origin().x;
    let y0 = layout.first_row_y();
    let mut out = Vec::new();
    for (i, period) in ranking.periods.iter().enumerate() {
        let x = x0 + scales.x.x(i);
        for record in &period.records {
            let value = metric.get(&record.value);
            let (y, fill) = match record.slot {
                Slot::Ranked { rank, pos } => {
                    let y = y0 + scales.slot.map(period.column_offset + pos);
                    let fill = if rank.get() > 0 {
                        scales.positive.map(value)
                    } else {
                        scales.negative.map(value)
                    };
                    (y, fill)
                }
                Slot::Unchanged { index } => {
                    (y0 + scales.unchanged.map(index), options.colors.unchanged)
                }
                Slot::Unplaced => continue,
            };
            out.push(Marker {
                record: RecordRef::new(i, record.value.series),
                center: Point::new(x, y),
                radius: layout.dot_radius,
                fill,
                section: record.section(),
                value,
            });
        }
    }
    out
}

/// A ranked bump chart.
#[derive(Debug)]
pub struct BumpChart<M> {
    pipeline: Pipeline<M>,
    slider: Option<SliderRange>,
    frame: Frame,
}

impl<M: TextMeasurer> BumpChart<M> {
    /// Builds a chart over an ingested dataset and renders it at the default level.
    pub fn new(data: &Dataset, options: ChartOptions, size: Size, measurer: M) -> Self {
        let table = MetricTable::compute(data, options.metric);
        let margins = Margins::measure(&measurer, &options.text_style, options.show_slider);
        let pipeline = Pipeline {
            measurer,
            options,
            size,
            margins,
            table,
        };
        let frame = pipeline.frame(pipeline.table.default_level, None);
        let slider = frame.slider.as_ref().map(|s| s.range);
        Self {
            pipeline,
            slider,
            frame,
        }
    }

    /// Ingests rows (using the configured tick field) and builds a chart.
    pub fn from_rows(
        rows: &[Row],
        options: ChartOptions,
        size: Size,
        measurer: M,
    ) -> Result<Self, IngestError> {
        let data = Dataset::ingest(rows, options.tick_field())?;
        Ok(Self::new(&data, options, size, measurer))
    }

    /// Recomputes everything at `level`.
    pub fn recompute(&mut self, level: f64) {
        self.frame = self.pipeline.frame(level, self.slider);
    }

    /// Changes the canvas size and recomputes at the current level.
    pub fn resize(&mut self, size: Size) {
        self.pipeline.size = size;
        self.recompute(self.frame.level);
    }

    /// The current frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The current level.
    pub fn level(&self) -> f64 {
        self.frame.level
    }

    /// The level a fresh chart starts at.
    pub fn default_level(&self) -> f64 {
        self.pipeline.table.default_level
    }

    /// The active metric.
    pub fn metric(&self) -> Metric {
        self.pipeline.options.metric
    }

    /// The configuration.
    pub fn options(&self) -> &ChartOptions {
        &self.pipeline.options
    }

    /// The canvas size.
    pub fn size(&self) -> Size {
        self.pipeline.size
    }

    /// The measured margins.
    pub fn margins(&self) -> Margins {
        self.pipeline.margins
    }

    /// The text measurer.
    pub fn measurer(&self) -> &M {
        &self.pipeline.measurer
    }

    /// The derived metric records.
    pub fn metrics(&self) -> &MetricTable {
        &self.pipeline.table
    }

    /// Outline of a marker in the configured shape.
    pub fn marker_path(&self, marker: &Marker) -> BezPath {
        self.pipeline.options.shape.path(marker.center, marker.radius)
    }
}
