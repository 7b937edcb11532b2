// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a chart frame for `rankflow_demo`.

use std::fmt::Write as _;

use kurbo::{Line, Point, Rect};
use peniko::Color;
use rankflow_core::{
    Effect, InteractionController, RecordRef, TextMeasurer, Tooltip, TooltipPlacement,
};

/// Host-side state the core leaves to the renderer.
#[derive(Clone, Debug, Default)]
pub(crate) struct Overlay {
    pub(crate) column: Option<usize>,
    pub(crate) series: Option<usize>,
    pub(crate) hovered: Option<RecordRef>,
    pub(crate) tooltip: Option<(Tooltip, TooltipPlacement)>,
}

impl Overlay {
    /// Folds one effect into the host state.
    pub(crate) fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::HighlightColumn(column) => self.column = *column,
            Effect::ShowTooltip(tooltip, placement) => {
                self.tooltip = Some((tooltip.clone(), *placement));
            }
            Effect::HideTooltip => self.tooltip = None,
            Effect::HighlightSeries(series) => self.series = Some(*series),
            Effect::ClearSeriesHighlight => {
                self.series = None;
                self.hovered = None;
            }
            Effect::Hovered(r) => self.hovered = Some(*r),
            _ => {}
        }
    }
}

pub(crate) fn render<M: TextMeasurer>(
    controller: &InteractionController<M>,
    overlay: &Overlay,
) -> String {
    let chart = controller.chart();
    let frame = chart.frame();
    let options = chart.options();
    let size = chart.size();
    let font_size = options.text_style.font_size;
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-size="{font_size}">"#,
        w = size.width,
        h = size.height,
    );

    if let Some(b) = frame.debug_bounds {
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="red"/>"#,
            b.x0,
            b.y0,
            b.width(),
            b.height(),
        );
    }

    if let Some(period) = overlay.column {
        let (fill, opacity) = svg_paint(options.colors.highlighter);
        write_rect(&mut out, frame.column_rect(period), &fill, opacity);
    }

    for tick in &frame.x_ticks {
        write_line(&mut out, tick.guide, "#ccc", true);
        write_text(&mut out, tick.anchor, &tick.label, "start", "hanging", None);
    }
    for tick in &frame.rank_ticks {
        write_text(&mut out, tick.anchor, &tick.label, "end", "middle", None);
    }
    if let Some(line) = frame.zero_line {
        write_line(&mut out, line, "#666", true);
    }
    if let Some(label) = frame.unchanged_label {
        let anchor = if label.end_anchored { "end" } else { "start" };
        write_text(&mut out, label.anchor, "Unchanged", anchor, "middle", None);
    }

    for marker in &frame.markers {
        let Some(record) = frame.record(marker.record) else {
            continue;
        };
        let path = chart.marker_path(marker).to_svg();
        let (fill, fill_opacity) = svg_paint(marker.fill);
        let _ = write!(out, r#"<path d="{path}" fill="{fill}""#);
        let opacity = controller.marker_opacity(record) * fill_opacity.unwrap_or(1.0);
        if opacity < 1.0 {
            let _ = write!(out, r#" fill-opacity="{opacity}""#);
        }
        if overlay.hovered == Some(marker.record) {
            let (stroke, _) = svg_paint(options.colors.hover);
            let _ = write!(out, r#" stroke="{stroke}" stroke-width="2""#);
        } else if overlay.series == Some(marker.record.series) {
            let width = if controller.is_focused(marker.record.series) {
                2
            } else {
                1
            };
            let _ = write!(out, r#" stroke="black" stroke-width="{width}""#);
        }
        out.push_str("/>\n");
    }

    let (legend_fill, _) = svg_paint(options.colors.legend);
    for item in &frame.legend_strip.items {
        let (fill, opacity) = svg_paint(item.fill);
        write_rect(&mut out, item.swatch, &fill, opacity);
        write_line(&mut out, item.tick, &legend_fill, false);
        write_text(
            &mut out,
            item.label_anchor,
            &item.label,
            "start",
            "alphabetic",
            Some(&legend_fill),
        );
    }

    if let Some(slider) = &frame.slider {
        write_rect(&mut out, slider.track, "#f4f4f4", None);
        let center = Point::new(slider.track.center().x, slider.label_y);
        let _ = writeln!(
            out,
            r#"<text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" transform="rotate(-90 {x} {y})">{}</text>"#,
            escape_xml(&slider.label),
            x = center.x,
            y = center.y,
        );
    }

    if let Some((tooltip, placement)) = &overlay.tooltip {
        let (box_fill, _) = svg_paint(options.tooltip.box_color);
        write_rect(
            &mut out,
            placement.frame,
            &box_fill,
            Some(options.tooltip.box_opacity),
        );
        let (text_fill, _) = svg_paint(options.tooltip.color);
        for (line, em) in tooltip.lines.iter().zip(tooltip.line_offsets_em()) {
            let at = Point::new(
                placement.text_origin.x,
                placement.text_origin.y + em * font_size,
            );
            write_text(&mut out, at, line, "start", "hanging", Some(&text_fill));
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_rect(out: &mut String, r: Rect, fill: &str, opacity: Option<f32>) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
    );
    if let Some(o) = opacity {
        let _ = write!(out, r#" fill-opacity="{o}""#);
    }
    out.push_str("/>\n");
}

fn write_line(out: &mut String, l: Line, stroke: &str, dashed: bool) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}""#,
        l.p0.x, l.p0.y, l.p1.x, l.p1.y,
    );
    if dashed {
        out.push_str(r#" stroke-dasharray="2 2""#);
    }
    out.push_str("/>\n");
}

fn write_text(
    out: &mut String,
    at: Point,
    text: &str,
    anchor: &str,
    baseline: &str,
    fill: Option<&str>,
) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
        at.x, at.y,
    );
    if let Some(fill) = fill {
        let _ = write!(out, r#" fill="{fill}""#);
    }
    let _ = writeln!(out, ">{}</text>", escape_xml(text));
}

fn svg_paint(color: Color) -> (String, Option<f32>) {
    let rgba = color.to_rgba8();
    let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f32::from(rgba.a) / 255.0)
    };
    (fill, opacity)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
