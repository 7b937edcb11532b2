// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical/horizontal layout of the bump chart.
//!
//! This follows a measure/arrange shape:
//! - **Measure**: derive text-driven margins (legend strip, inner margin, rank labels and
//!   slider on the left) from the text measurer.
//! - **Arrange**: pick a uniform marker radius that fits every period side by side and
//!   every dot row stacked, then compute the [`Shift`] and total vertical extent that keep
//!   the level line straight across periods.

use kurbo::{Point, Rect};
use rankflow_text::{TextMeasurer, TextStyle};

use crate::rank::Ranking;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One extreme of the below-level counts across periods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShiftBound {
    /// Number of members below the level.
    pub offset: usize,
    /// Position of the first period reaching this count, if any period did.
    pub period: Option<usize>,
}

/// Minimum and maximum number of below-level members found in any single period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shift {
    /// Fewest members below the level.
    pub min: ShiftBound,
    /// Most members below the level.
    pub max: ShiftBound,
}

/// Computes the [`Shift`] of a ranking.
///
/// `max` starts at 0 and `min` at the series count; only strictly better periods replace
/// the current bound, so the first period to reach an extreme is the one recorded.
pub fn compute_shift(ranking: &Ranking) -> Shift {
    let mut max = ShiftBound::default();
    let mut min = ShiftBound {
        offset: ranking.series_count,
        period: None,
    };
    for (i, p) in ranking.periods.iter().enumerate() {
        let c = p.below_level;
        log::trace!("period {i} ({}) has {c} members below level", p.tick);
        if c > max.offset {
            max = ShiftBound {
                offset: c,
                period: Some(i),
            };
        }
        if c < min.offset {
            min = ShiftBound {
                offset: c,
                period: Some(i),
            };
        }
    }
    Shift { min, max }
}

/// Text-driven margins of the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    /// Height of the reference glyph box (`"M"`).
    pub char_height: f64,
    /// Height reserved above the plot for the legend strip.
    pub legend_height: f64,
    /// Gap between the x-axis labels and the first dot row.
    pub inner_margin: f64,
    /// Width reserved on the left for the slider and rank labels.
    pub left_margin: f64,
}

impl Margins {
    /// Widest rank label the left margin must fit.
    pub const RANK_LABEL_SAMPLE: &'static str = "-999";
    /// Width of the slider control itself.
    pub const SLIDER_WIDTH: f64 = 40.0;
    /// Length of a rank tick line.
    pub const TICK_SIZE: f64 = 6.0;

    /// Measures the margins for a font style.
    pub fn measure(measurer: &dyn TextMeasurer, style: &TextStyle, show_slider: bool) -> Self {
        let char_height = measurer.measure("M", style).line_height();
        let rank_label = measurer.width(Self::RANK_LABEL_SAMPLE, style);
        let slider = if show_slider {
            Self::SLIDER_WIDTH + char_height
        } else {
            0.0
        };
        Self {
            char_height,
            legend_height: char_height * 3.0,
            inner_margin: char_height * 2.0,
            left_margin: slider + rank_label + Self::TICK_SIZE,
        }
    }
}

/// Inputs for marker sizing that do not depend on the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotFit {
    /// Available canvas.
    pub size: Size,
    /// Chart margins.
    pub margins: Margins,
    /// Number of series.
    pub series_count: usize,
    /// Number of charted periods.
    pub period_count: usize,
    /// Largest zero-growth count of any period.
    pub max_unchanged_count: usize,
}

impl DotFit {
    /// Number of stacked dot rows the vertical space must hold.
    pub fn rows(&self) -> usize {
        let mut n = self.series_count * 2;
        if self.max_unchanged_count > 0 {
            n += self.max_unchanged_count + 2;
        }
        n
    }

    /// Height available to dot rows.
    pub fn available_height(&self) -> f64 {
        self.size.height - self.margins.inner_margin - self.margins.legend_height
    }

    /// Chooses the uniform marker radius.
    ///
    /// The radius is the smaller of the vertical fit (`rows` stacked) and the horizontal fit
    /// (`periods` side by side). No lower bound is enforced: a canvas too small produces a
    /// zero or negative radius. A non-finite result (no rows and no periods) is 0.
    pub fn radius(&self) -> f64 {
        let avail = self.available_height();
        let n = self.rows() as f64;
        let r1 = avail / n / 2.0;
        let r2 = (self.size.width - self.margins.left_margin) / self.period_count as f64 / 2.0;

        let r = if r1 < r2 {
            r1
        } else if r2 > avail {
            let total = n * r2;
            r2 - (total - avail) / 2.0
        } else {
            r2
        };

        if !r.is_finite() {
            return 0.0;
        }
        if r <= 0.0 {
            log::warn!(
                "canvas {}x{} too small for {} dot rows: radius {r}",
                self.size.width,
                self.size.height,
                self.rows()
            );
        }
        r
    }
}

/// Placement of the "Unchanged" bucket label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnchangedLabel {
    /// Anchor point in chart coordinates.
    pub anchor: Point,
    /// Whether the label is right-aligned at the anchor (raised because it would overflow).
    pub end_anchored: bool,
}

/// The arranged chart layout for one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Canvas size.
    pub size: Size,
    /// Text-driven margins.
    pub margins: Margins,
    /// Marker radius.
    pub dot_radius: f64,
    /// Marker diameter; the height of one dot row.
    pub dot_diameter: f64,
    /// Below-level extremes across periods.
    pub shift: Shift,
    /// Total vertical extent of a period column.
    pub max_y: f64,
    /// Number of series.
    pub series_count: usize,
    /// Largest zero-growth count of any period.
    pub max_unchanged_count: usize,
    /// Whether the unchanged bucket is laid out.
    pub isolate_unchanged: bool,
}

impl ChartLayout {
    /// Arranges the chart for a ranking.
    pub fn arrange(ranking: &Ranking, size: Size, margins: Margins) -> Self {
        let fit = DotFit {
            size,
            margins,
            series_count: ranking.series_count,
            period_count: ranking.periods.len(),
            max_unchanged_count: ranking.max_unchanged_count,
        };
        let dot_radius = fit.radius();
        let dot_diameter = dot_radius * 2.0;
        let shift = compute_shift(ranking);
        let isolate_unchanged = ranking.params.isolate_unchanged;

        let mut rows = shift.max.offset + ranking.series_count;
        if isolate_unchanged && ranking.max_unchanged_count > 0 {
            rows += ranking.max_unchanged_count + 2;
        }
        let max_y = rows as f64 * dot_diameter;

        Self {
            size,
            margins,
            dot_radius,
            dot_diameter,
            shift,
            max_y,
            series_count: ranking.series_count,
            max_unchanged_count: ranking.max_unchanged_count,
            isolate_unchanged,
        }
    }

    /// Horizontal extent available to period columns.
    pub fn plot_width(&self) -> f64 {
        self.size.width - self.margins.left_margin
    }

    /// Origin of the plot group: period column `x = 0` and the top of the legend gap.
    pub fn plot_origin(&self) -> Point {
        Point::new(
            self.margins.left_margin - self.dot_radius,
            self.margins.legend_height,
        )
    }

    /// The y coordinate of the first dot row (slot 0 with no column offset).
    pub fn first_row_y(&self) -> f64 {
        self.margins.legend_height + self.margins.inner_margin
    }

    /// The hover highlighter rectangle for a column centred at `x`.
    pub fn column_rect(&self, x: f64) -> Rect {
        let r = self.dot_radius;
        let y0 = self.first_row_y() - r;
        Rect::new(x - r, y0, x + r, y0 + self.max_y)
    }

    /// Where to put the "Unchanged" label, if an unchanged bucket is drawn.
    pub fn unchanged_label(&self) -> Option<UnchangedLabel> {
        if !self.isolate_unchanged || self.max_unchanged_count == 0 {
            return None;
        }
        let origin = self.plot_origin();
        let x = origin.x - self.dot_radius;
        let ty = self.max_y + self.margins.inner_margin;
        let overflow =
            ty + self.margins.legend_height + self.margins.char_height > self.size.height;
        Some(if overflow {
            UnchangedLabel {
                anchor: Point::new(x, origin.y + ty - self.dot_radius),
                end_anchored: true,
            }
        } else {
            UnchangedLabel {
                anchor: Point::new(x, origin.y + ty),
                end_anchored: false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::dataset::{Dataset, Row};
    use crate::metric::{Metric, MetricTable};
    use crate::rank::RankParams;
    use rankflow_text::HeuristicTextMeasurer;

    fn margins() -> Margins {
        Margins {
            char_height: 10.0,
            legend_height: 30.0,
            inner_margin: 20.0,
            left_margin: 50.0,
        }
    }

    #[test]
    fn margins_follow_text_metrics() {
        let m = Margins::measure(&HeuristicTextMeasurer, &TextStyle::new(10.0), true);
        assert!((m.char_height - 10.0).abs() < 1e-9);
        assert!((m.legend_height - 30.0).abs() < 1e-9);
        assert!((m.inner_margin - 20.0).abs() < 1e-9);
        // slider (40 + 10) + "-999" (24) + tick (6).
        assert!((m.left_margin - 80.0).abs() < 1e-9);

        let m = Margins::measure(&HeuristicTextMeasurer, &TextStyle::new(10.0), false);
        assert!((m.left_margin - 30.0).abs() < 1e-9);
    }

    #[test]
    fn radius_is_limited_by_height_when_tall_rows() {
        let fit = DotFit {
            size: Size::new(1050.0, 250.0),
            margins: margins(),
            series_count: 5,
            period_count: 10,
            max_unchanged_count: 0,
        };
        // r1 = 200 / 10 / 2 = 10; r2 = 1000 / 10 / 2 = 50.
        assert!((fit.radius() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn radius_is_limited_by_width_when_many_periods() {
        let fit = DotFit {
            size: Size::new(250.0, 1050.0),
            margins: margins(),
            series_count: 2,
            period_count: 20,
            max_unchanged_count: 1,
        };
        // rows = 4 + 3 = 7; r1 = 1000 / 7 / 2; r2 = 200 / 20 / 2 = 5.
        assert_eq!(fit.rows(), 7);
        assert!((fit.radius() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_canvas_propagates_non_positive_radius() {
        let fit = DotFit {
            size: Size::new(600.0, 40.0),
            margins: margins(),
            series_count: 3,
            period_count: 4,
            max_unchanged_count: 0,
        };
        assert!(fit.radius() < 0.0);
    }

    #[test]
    fn empty_chart_has_zero_radius() {
        let fit = DotFit {
            size: Size::new(600.0, 400.0),
            margins: margins(),
            series_count: 0,
            period_count: 0,
            max_unchanged_count: 0,
        };
        assert_eq!(fit.radius(), 0.0);
    }

    fn ranking(level: f64, isolate: bool) -> Ranking {
        let rows = vec![
            Row::new().with("t", "P0").with("A", 0.0).with("B", 0.0).with("C", 0.0),
            Row::new().with("t", "P1").with("A", 4.0).with("B", -2.0).with("C", 0.0),
            Row::new().with("t", "P2").with("A", 1.0).with("B", -3.0).with("C", -1.0),
            Row::new().with("t", "P3").with("A", 5.0).with("B", 1.0).with("C", 2.0),
        ];
        let table = MetricTable::compute(&Dataset::ingest(&rows, None).unwrap(), Metric::Growth);
        Ranking::rank_all(
            &table,
            &RankParams {
                metric: Metric::Growth,
                level,
                isolate_unchanged: isolate,
            },
        )
    }

    #[test]
    fn shift_records_first_extreme_periods() {
        let r = ranking(0.0, true);
        // Growths: P1 [4, -2, 0], P2 [-3, -1, -1], P3 [4, 4, 3].
        let shift = compute_shift(&r);
        assert_eq!(
            shift.max,
            ShiftBound {
                offset: 3,
                period: Some(1)
            }
        );
        assert_eq!(
            shift.min,
            ShiftBound {
                offset: 0,
                period: Some(2)
            }
        );
    }

    #[test]
    fn max_y_reserves_unchanged_rows() {
        let r = ranking(0.0, true);
        let layout = ChartLayout::arrange(&r, Size::new(400.0, 400.0), margins());
        let d = layout.dot_diameter;
        // (3 below + 3 series + 1 unchanged + 2 gap) rows.
        assert!((layout.max_y - 9.0 * d).abs() < 1e-9);
        assert!(layout.unchanged_label().is_some());

        let r = ranking(0.0, false);
        let layout = ChartLayout::arrange(&r, Size::new(400.0, 400.0), margins());
        assert!((layout.max_y - 6.0 * layout.dot_diameter).abs() < 1e-9);
        assert!(layout.unchanged_label().is_none());
    }

    #[test]
    fn column_rect_spans_max_y() {
        let r = ranking(0.0, false);
        let layout = ChartLayout::arrange(&r, Size::new(400.0, 400.0), margins());
        let rect = layout.column_rect(100.0);
        assert!((rect.width() - layout.dot_diameter).abs() < 1e-9);
        assert!((rect.height() - layout.max_y).abs() < 1e-9);
    }
}
