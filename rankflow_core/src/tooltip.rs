// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker tooltip content, sizing and placement.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size as KSize};
use rankflow_text::{TextMeasurer, TextStyle};

use crate::format::format_percent;
use crate::layout::Size;
use crate::metric::ValueRecord;

/// Tooltip text for one record.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Lines, top to bottom.
    pub lines: Vec<String>,
}

impl Tooltip {
    /// Line spacing in multiples of the char height.
    pub const LINE_SPACING: f64 = 1.1;
    /// Horizontal padding added to the widest line.
    pub const PADDING_X: f64 = 15.0;
    /// Vertical padding added to the text block.
    pub const PADDING_Y: f64 = 5.0;
    /// Offset of the box outline from the text origin.
    pub const INSET: f64 = 5.0;

    /// Builds the tooltip of a record: tick, key, number, growth and growth rate.
    ///
    /// Growth shows `-` for the first input row and for zero or undefined growth; the
    /// rate shows `-` for the first input row and for a zero or undefined rate.
    pub fn for_record(record: &ValueRecord) -> Self {
        let first = record.period == 0;
        let growth = if first || record.growth == 0.0 || record.growth.is_nan() {
            String::from("-")
        } else {
            format!("{}", record.growth)
        };
        let rate = if first || record.rate == 0.0 || record.rate.is_nan() {
            String::from("-")
        } else {
            format!("{}%", format_percent(record.rate, 2))
        };
        Self {
            lines: alloc::vec![
                String::from(&*record.tick),
                String::from(&*record.key),
                format!("Number: {}", record.number),
                format!("Growth: {growth}"),
                format!("Growth Rate: {rate}"),
            ],
        }
    }

    /// Measures the tooltip box.
    pub fn size(&self, measurer: &dyn TextMeasurer, style: &TextStyle) -> KSize {
        let char_height = measurer.measure("M", style).line_height();
        let width = self
            .lines
            .iter()
            .map(|l| measurer.width(l, style))
            .fold(0.0, f64::max);
        KSize::new(
            width + Self::PADDING_X,
            Self::LINE_SPACING * char_height * self.lines.len() as f64 + Self::PADDING_Y,
        )
    }

    /// Places a box of `size` next to a marker, flipping sides when it would overflow.
    ///
    /// The box sits below and to the right of the marker; it moves to the left or above
    /// when the canvas edge is in the way.
    pub fn place(center: Point, radius: f64, size: KSize, view: Size) -> TooltipPlacement {
        let anchor = Point::new(center.x + 2.0 * radius, center.y + 2.0 * radius);
        let diameter = 2.0 * radius;
        let x = if anchor.x + size.width + radius > view.width {
            anchor.x - size.width - diameter
        } else {
            anchor.x
        };
        let y = if anchor.y + size.height + radius > view.height {
            anchor.y - size.height - diameter
        } else {
            anchor.y
        };
        TooltipPlacement {
            text_origin: Point::new(x, y),
            frame: Rect::from_origin_size((x - Self::INSET, y - Self::INSET), size),
        }
    }

    /// Baseline offsets of each line below the text origin, in em.
    pub fn line_offsets_em(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.lines.len()).map(|i| Self::LINE_SPACING * i as f64 + 1.0)
    }
}

/// A positioned tooltip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPlacement {
    /// Origin of the first text line.
    pub text_origin: Point,
    /// Background box.
    pub frame: Rect,
}
