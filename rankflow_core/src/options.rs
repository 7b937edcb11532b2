// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration.
//!
//! Options are plain values: build one, hand it to [`BumpChart`](crate::BumpChart), and
//! build a new one to change anything.

use peniko::Color;
use peniko::color::palette::css;
use rankflow_text::TextStyle;

use crate::color::Palette;
use crate::metric::Metric;
use crate::symbol::Symbol;
use crate::ticks::TickSpec;

/// What clicking a marker or legend bucket does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClickAction {
    /// Toggle a persistent series or range highlight.
    #[default]
    Highlight,
    /// Ignore clicks.
    None,
}

/// Colors of chart furniture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartColors {
    /// Legend labels.
    pub legend: Color,
    /// Stroke of the hovered marker.
    pub hover: Color,
    /// Hovered column background.
    pub highlighter: Color,
    /// Markers in the unchanged bucket.
    pub unchanged: Color,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            legend: css::BLACK,
            hover: Color::from_rgba8(0x99, 0x99, 0x99, 0xff),
            highlighter: Color::from_rgba8(0xee, 0xee, 0xee, 0xff),
            unchanged: Color::from_rgba8(0xaa, 0xaa, 0xaa, 0xff),
        }
    }
}

/// Tooltip box styling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipStyle {
    /// Text color.
    pub color: Color,
    /// Box fill.
    pub box_color: Color,
    /// Box fill opacity.
    pub box_opacity: f32,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            color: css::BLACK,
            box_color: css::WHITE,
            box_opacity: 0.8,
        }
    }
}

/// Everything that configures a bump chart.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Metric markers are ranked and colored by.
    pub metric: Metric,
    /// Move zero-growth members into a separate bucket below the ranked column.
    pub isolate_unchanged: bool,
    /// Palette of the positive partition.
    pub pos_palette: Palette,
    /// Palette of the negative partition.
    pub neg_palette: Palette,
    /// Marker shape.
    pub shape: Symbol,
    /// Click behaviour.
    pub click_action: ClickAction,
    /// Reserve room for, and report, the level slider.
    pub show_slider: bool,
    /// Font for every label.
    pub text_style: TextStyle,
    /// Furniture colors.
    pub colors: ChartColors,
    /// Tooltip styling.
    pub tooltip: TooltipStyle,
    /// Period tick configuration.
    pub tick: TickSpec,
    /// Emit the canvas boundary for debugging.
    pub debug: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Growth,
            isolate_unchanged: true,
            pos_palette: Palette::yl_gn_bu(),
            neg_palette: Palette::yl_or_rd(),
            shape: Symbol::Circle,
            click_action: ClickAction::Highlight,
            show_slider: true,
            text_style: TextStyle::new(10.0),
            colors: ChartColors::default(),
            tooltip: TooltipStyle::default(),
            tick: TickSpec::default(),
            debug: false,
        }
    }
}

impl ChartOptions {
    /// Sets the ranked metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables or disables the unchanged bucket.
    pub fn with_isolate_unchanged(mut self, isolate: bool) -> Self {
        self.isolate_unchanged = isolate;
        self
    }

    /// Sets both partition palettes.
    pub fn with_palettes(mut self, positive: Palette, negative: Palette) -> Self {
        self.pos_palette = positive;
        self.neg_palette = negative;
        self
    }

    /// Sets the marker shape.
    pub fn with_shape(mut self, shape: Symbol) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the click behaviour.
    pub fn with_click_action(mut self, action: ClickAction) -> Self {
        self.click_action = action;
        self
    }

    /// Shows or hides the slider.
    pub fn with_slider(mut self, show: bool) -> Self {
        self.show_slider = show;
        self
    }

    /// Sets the label font.
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Sets the furniture colors.
    pub fn with_colors(mut self, colors: ChartColors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the tooltip style.
    pub fn with_tooltip(mut self, tooltip: TooltipStyle) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Sets the period tick configuration.
    pub fn with_tick(mut self, tick: TickSpec) -> Self {
        self.tick = tick;
        self
    }

    /// Enables the debug boundary.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Tick field name, if one was configured.
    pub fn tick_field(&self) -> Option<&str> {
        (!self.tick.name.is_empty()).then_some(self.tick.name.as_str())
    }
}
