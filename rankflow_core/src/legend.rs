// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend buckets: the color scales discretized into a short strip of ranges.
//!
//! Ticks from both color scales are merged and walked in strides of three, so the
//! legend keeps a bounded number of entries whatever the tick density is. Each bucket
//! covers `[floor, ceiling)`, and hovering or clicking one filters markers to that range.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};
use peniko::Color;
use rankflow_text::{TextMeasurer, TextStyle};
use smallvec::SmallVec;

use crate::format::{format_fixed, format_si};
use crate::metric::Metric;
use crate::scale::{DEFAULT_TICK_COUNT, Scales};

/// Ticks merged into one bucket.
pub const BUCKET_STRIDE: usize = 3;

/// One legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendBucket {
    /// Inclusive lower bound.
    pub floor: f64,
    /// Exclusive upper bound (`+inf` for the last bucket).
    pub ceiling: f64,
    /// Swatch color.
    pub color: Color,
    /// Label of the floor value.
    pub label: String,
}

impl LegendBucket {
    /// Whether `v` falls in `[floor, ceiling)`.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.floor && v < self.ceiling
    }

    /// Whether two buckets describe the same range.
    pub fn same_range(&self, other: &Self) -> bool {
        self.floor == other.floor && self.ceiling == other.ceiling
    }
}

/// The buckets of one recompute, in ascending order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegendBuckets {
    /// Buckets, lowest first.
    pub buckets: SmallVec<[LegendBucket; 8]>,
    /// Whether labels are percentages.
    pub percent: bool,
}

impl LegendBuckets {
    /// Builds the buckets from the color scales.
    pub fn build(scales: &Scales, level: f64, metric: Metric, p_max: f64) -> Self {
        let mut ts = scales.negative.ticks(DEFAULT_TICK_COUNT);
        ts.extend(scales.positive.ticks(DEFAULT_TICK_COUNT));
        ts.sort_by(f64::total_cmp);

        let percent = metric == Metric::Rate;
        let bucket = |i: usize| {
            let floor = ts[i];
            let color = if floor < level {
                scales.negative.map(floor)
            } else {
                scales.positive.map(floor)
            };
            LegendBucket {
                floor,
                ceiling: ts.get(i + BUCKET_STRIDE).copied().unwrap_or(f64::INFINITY),
                color,
                label: label(floor, percent),
            }
        };

        let mut buckets: SmallVec<[LegendBucket; 8]> = (0..ts.len().saturating_sub(1))
            .step_by(BUCKET_STRIDE)
            .map(&bucket)
            .collect();

        if let Some(&last) = ts.last() {
            let captured = buckets.last().is_some_and(|b| b.floor == last);
            if !captured && last <= p_max {
                let terminal = bucket(ts.len() - 1);
                if let Some(prev) = buckets.last_mut() {
                    prev.ceiling = terminal.floor;
                }
                buckets.push(terminal);
            }
        }

        Self { buckets, percent }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns a bucket by index.
    pub fn get(&self, index: usize) -> Option<&LegendBucket> {
        self.buckets.get(index)
    }

    /// Display text of a bucket; the last one reads as "greater than".
    pub fn display_label(&self, index: usize) -> Option<String> {
        let b = self.buckets.get(index)?;
        if index + 1 == self.buckets.len() {
            let suffix = if self.percent { "%" } else { "" };
            Some(format!(">{}{suffix}", b.label))
        } else {
            Some(b.label.clone())
        }
    }

    /// Lays the buckets out as a horizontal strip flush with the top-right corner.
    pub fn strip(
        &self,
        measurer: &dyn TextMeasurer,
        style: &TextStyle,
        canvas_width: f64,
    ) -> LegendStrip {
        let item_width = self
            .buckets
            .iter()
            .map(|b| measurer.width(&b.label, style))
            .fold(0.0, f64::max)
            + LegendStrip::ITEM_PADDING;
        let origin_x = canvas_width - self.buckets.len() as f64 * item_width;
        let em = style.font_size;
        let items = self
            .buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let x = origin_x + i as f64 * item_width;
                LegendItem {
                    swatch: Rect::new(x, 0.0, x + item_width, em),
                    fill: b.color,
                    tick: Line::new((x + 0.5, em), (x + 0.5, em * 1.3)),
                    label: self.display_label(i).unwrap_or_default(),
                    label_anchor: Point::new(x, em * 2.2),
                }
            })
            .collect();
        LegendStrip {
            item_width,
            origin_x,
            items,
        }
    }
}

fn label(v: f64, percent: bool) -> String {
    if percent {
        format_fixed(v * 100.0, 1)
    } else {
        format_si(v, 2)
    }
}

/// One positioned legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// Swatch rectangle; also the hover/click target.
    pub swatch: Rect,
    /// Swatch fill.
    pub fill: Color,
    /// Short tick under the left edge of the swatch.
    pub tick: Line,
    /// Display label.
    pub label: String,
    /// Start-anchored label baseline position.
    pub label_anchor: Point,
}

/// The positioned legend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegendStrip {
    /// Width of every item.
    pub item_width: f64,
    /// Left edge of the first item.
    pub origin_x: f64,
    /// Items, lowest bucket first.
    pub items: Vec<LegendItem>,
}

impl LegendStrip {
    /// Space added to the widest label.
    pub const ITEM_PADDING: f64 = 10.0;

    /// Returns the bucket index under `p`, if any.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.items.iter().position(|item| item.swatch.contains(p))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::color::Palette;
    use crate::scale::ScaleSequential;
    use rankflow_text::HeuristicTextMeasurer;

    fn scales(p: (f64, f64), n: (f64, f64)) -> Scales {
        use crate::scale::{RankAxisScale, ScalePoint, SlotScale, UnchangedScale};
        Scales {
            x: ScalePoint::new((0.0, 100.0), 2),
            slot: SlotScale { diameter: 1.0 },
            rank: RankAxisScale {
                len: 1,
                diameter: 1.0,
            },
            unchanged: UnchangedScale {
                bottom: 0.0,
                count: 0,
                diameter: 1.0,
            },
            positive: ScaleSequential::new(p, Palette::yl_gn_bu())
                .nice(DEFAULT_TICK_COUNT)
                .with_clamp(true),
            negative: ScaleSequential::new(n, Palette::yl_or_rd())
                .nice(DEFAULT_TICK_COUNT)
                .with_clamp(true),
        }
    }

    #[test]
    fn buckets_are_contiguous_and_ordered() {
        let s = scales((0.0, 9.0), (0.0, -9.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 9.0);
        assert!(!legend.is_empty());
        for w in legend.buckets.windows(2) {
            assert_eq!(w[0].ceiling, w[1].floor);
            assert!(w[0].floor <= w[1].floor);
        }
        assert_eq!(legend.buckets.last().unwrap().ceiling, f64::INFINITY);
    }

    #[test]
    fn terminal_bucket_captures_final_tick() {
        // Ticks -9..=0 and 0..=9 merge to 20 values; the last stride starts at ts[18] = 8.
        let s = scales((0.0, 9.0), (0.0, -9.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 9.0);
        let last = legend.buckets.last().unwrap();
        assert_eq!(last.floor, 9.0);
        let prev = &legend.buckets[legend.len() - 2];
        assert_eq!(prev.ceiling, 9.0);

        // Not added when the final tick exceeds the positive maximum.
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 8.5);
        assert_ne!(legend.buckets.last().unwrap().floor, 9.0);
    }

    #[test]
    fn bucket_strides_follow_the_niced_domain() {
        // [0, 14.5] nices to [0, 16] at step 2: one negative tick plus 0, 2, .., 16.
        let s = scales((0.0, 14.5), (0.0, 0.0));
        assert_eq!(s.positive.domain(), (0.0, 16.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 14.5);
        let floors: Vec<f64> = legend.buckets.iter().map(|b| b.floor).collect();
        assert_eq!(floors, vec![0.0, 4.0, 10.0]);
        assert_eq!(legend.buckets[2].ceiling, 16.0);
    }

    #[test]
    fn colors_come_from_the_owning_scale() {
        let s = scales((0.0, 9.0), (0.0, -9.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 9.0);
        let first = &legend.buckets[0];
        assert!(first.floor < 0.0);
        assert_eq!(first.color, s.negative.map(first.floor));
        let pos = legend.buckets.iter().find(|b| b.floor >= 0.0).unwrap();
        assert_eq!(pos.color, s.positive.map(pos.floor));
    }

    #[test]
    fn rate_labels_are_percentages() {
        let s = scales((0.0, 9.0), (0.0, -9.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Rate, 9.0);
        assert_eq!(legend.buckets[0].label, "-900.0");
        let last = legend.len() - 1;
        assert!(legend.display_label(last).unwrap().starts_with('>'));
        assert!(legend.display_label(last).unwrap().ends_with('%'));
    }

    #[test]
    fn contains_is_half_open() {
        let b = LegendBucket {
            floor: 1.0,
            ceiling: 4.0,
            color: Color::TRANSPARENT,
            label: String::new(),
        };
        assert!(b.contains(1.0));
        assert!(b.contains(3.9));
        assert!(!b.contains(4.0));
        assert!(!b.contains(f64::NAN));
    }

    #[test]
    fn strip_is_right_aligned() {
        let s = scales((0.0, 9.0), (0.0, -9.0));
        let legend = LegendBuckets::build(&s, 0.0, Metric::Growth, 9.0);
        let style = TextStyle::new(10.0);
        let strip = legend.strip(&HeuristicTextMeasurer, &style, 600.0);
        let last = strip.items.last().unwrap();
        assert!((last.swatch.x1 - 600.0).abs() < 1e-9);
        assert_eq!(strip.items.len(), legend.len());
        assert_eq!(strip.hit_test(Point::new(599.0, 5.0)), Some(legend.len() - 1));
        assert_eq!(strip.hit_test(Point::new(599.0, 50.0)), None);
    }
}
