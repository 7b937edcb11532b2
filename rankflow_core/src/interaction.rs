// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, click and level interaction as a synchronous state machine.
//!
//! The controller owns the chart, the current level and the focus state. A host feeds it
//! [`Event`]s from its input layer and applies the returned [`Effect`]s to whatever it
//! draws with. Host callbacks are delivered through [`ChartHandler`].

use smallvec::SmallVec;

use rankflow_text::TextMeasurer;

use crate::chart::{BumpChart, RecordRef};
use crate::layout::Size;
use crate::legend::LegendBucket;
use crate::options::ClickAction;
use crate::rank::{RankedRecord, Section};
use crate::tooltip::{Tooltip, TooltipPlacement};

/// Opacity of markers outside an active legend range.
pub const DIMMED_OPACITY: f32 = 0.3;

/// The persistent highlight.
///
/// At most one kind of focus is active; entering one cancels the other first.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FocusState {
    /// Nothing focused.
    #[default]
    None,
    /// A series, focused by clicking one of its markers.
    Key(RecordRef),
    /// A legend range.
    Range(LegendBucket),
}

/// Input events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The pointer entered a period column.
    ColumnEnter(usize),
    /// The pointer left the plot.
    PlotLeave,
    /// The pointer entered a marker.
    MarkerEnter(RecordRef),
    /// The pointer left a marker.
    MarkerLeave(RecordRef),
    /// A marker was clicked.
    MarkerClick(RecordRef),
    /// The pointer entered a legend bucket.
    LegendEnter(usize),
    /// The pointer left a legend bucket.
    LegendLeave(usize),
    /// A legend bucket was clicked.
    LegendClick(usize),
    /// A click that hit neither a marker nor a legend bucket.
    BackgroundClick,
    /// The slider (or the host) set a new level.
    SetLevel(f64),
    /// The slider was double-activated: go back to the default level.
    ResetLevel,
    /// The canvas changed size.
    Resize(Size),
}

/// Changes the host should apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Show the column highlighter for a period, or hide it.
    HighlightColumn(Option<usize>),
    /// Mark every marker of a series.
    HighlightSeries(usize),
    /// Remove all series marks.
    ClearSeriesHighlight,
    /// Show a tooltip.
    ShowTooltip(Tooltip, TooltipPlacement),
    /// Hide the tooltip.
    HideTooltip,
    /// Dim markers outside a range.
    ApplyRangeFilter(LegendBucket),
    /// Restore full opacity.
    ClearRangeFilter,
    /// The frame changed; redraw it.
    Rerender,
    /// Host hover callback.
    Hovered(RecordRef),
    /// Host click callback.
    Clicked(RecordRef),
    /// Host cancel callback.
    Cancelled(RecordRef),
}

/// Effects of one event, in order.
pub type Effects = SmallVec<[Effect; 4]>;

/// Host callbacks.
pub trait ChartHandler {
    /// A marker was hovered.
    fn on_hover(&mut self, _record: &RankedRecord) {}
    /// A series was focused by clicking one of its markers.
    fn on_click(&mut self, _record: &RankedRecord) {}
    /// The focused series was clicked again and released.
    fn on_cancel(&mut self, _record: &RankedRecord) {}
}

/// Owns a chart and its interactive state.
#[derive(Debug)]
pub struct InteractionController<M> {
    chart: BumpChart<M>,
    focus: FocusState,
    preview: Option<LegendBucket>,
}

impl<M: TextMeasurer> InteractionController<M> {
    /// Wraps a chart with no focus.
    pub fn new(chart: BumpChart<M>) -> Self {
        Self {
            chart,
            focus: FocusState::None,
            preview: None,
        }
    }

    /// The chart.
    pub fn chart(&self) -> &BumpChart<M> {
        &self.chart
    }

    /// Current focus.
    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    /// Current level.
    pub fn level(&self) -> f64 {
        self.chart.level()
    }

    /// Applies an event and returns what the host should do about it.
    pub fn handle_event(&mut self, event: Event) -> Effects {
        let mut fx = Effects::new();
        match event {
            Event::ColumnEnter(period) => fx.push(Effect::HighlightColumn(Some(period))),
            Event::PlotLeave => fx.push(Effect::HighlightColumn(None)),
            Event::MarkerEnter(r) => self.marker_enter(r, &mut fx),
            Event::MarkerLeave(_) => {
                if !matches!(self.focus, FocusState::Key(_)) {
                    fx.push(Effect::ClearSeriesHighlight);
                }
                fx.push(Effect::HideTooltip);
            }
            Event::MarkerClick(r) => self.marker_click(r, &mut fx),
            Event::LegendEnter(i) => {
                if !matches!(self.focus, FocusState::Range(_))
                    && let Some(b) = self.chart.frame().legend.get(i).cloned()
                {
                    self.preview = Some(b.clone());
                    fx.push(Effect::ApplyRangeFilter(b));
                }
            }
            Event::LegendLeave(_) => {
                if !matches!(self.focus, FocusState::Range(_)) {
                    self.preview = None;
                    fx.push(Effect::ClearRangeFilter);
                }
            }
            Event::LegendClick(i) => self.legend_click(i, &mut fx),
            Event::BackgroundClick => {
                if self.chart.options().click_action == ClickAction::Highlight {
                    log::debug!("background click clears {:?}", self.focus);
                    self.focus = FocusState::None;
                    self.preview = None;
                    fx.push(Effect::ClearSeriesHighlight);
                    fx.push(Effect::ClearRangeFilter);
                }
            }
            Event::SetLevel(level) => {
                self.chart.recompute(level);
                fx.push(Effect::Rerender);
                self.reapply_focus(&mut fx);
            }
            Event::ResetLevel => {
                let level = self.chart.default_level();
                self.chart.recompute(level);
                fx.push(Effect::Rerender);
                self.reapply_focus(&mut fx);
            }
            Event::Resize(size) => {
                self.chart.resize(size);
                fx.push(Effect::Rerender);
                self.reapply_focus(&mut fx);
            }
        }
        fx
    }

    fn marker_enter(&self, r: RecordRef, fx: &mut Effects) {
        let frame = self.chart.frame();
        let (Some(record), Some(marker)) = (frame.record(r), frame.marker(r)) else {
            return;
        };
        if !matches!(self.focus, FocusState::Key(_)) {
            fx.push(Effect::HighlightSeries(r.series));
        }
        let tooltip = Tooltip::for_record(&record.value);
        let style = &self.chart.options().text_style;
        let size = tooltip.size(self.chart.measurer(), style);
        let placement = Tooltip::place(marker.center, marker.radius, size, self.chart.size());
        fx.push(Effect::ShowTooltip(tooltip, placement));
        fx.push(Effect::Hovered(r));
    }

    fn marker_click(&mut self, r: RecordRef, fx: &mut Effects) {
        if self.chart.options().click_action == ClickAction::None {
            return;
        }
        match &self.focus {
            FocusState::Key(current) if current.series == r.series => {
                log::debug!("series {} released", r.series);
                self.focus = FocusState::None;
                fx.push(Effect::ClearSeriesHighlight);
                fx.push(Effect::Cancelled(r));
            }
            _ => {
                if matches!(self.focus, FocusState::Range(_)) {
                    fx.push(Effect::ClearRangeFilter);
                }
                log::debug!("series {} focused", r.series);
                self.focus = FocusState::Key(r);
                self.preview = None;
                fx.push(Effect::ClearSeriesHighlight);
                fx.push(Effect::HighlightSeries(r.series));
                fx.push(Effect::Clicked(r));
            }
        }
    }

    fn legend_click(&mut self, index: usize, fx: &mut Effects) {
        if self.chart.options().click_action == ClickAction::None {
            return;
        }
        let Some(bucket) = self.chart.frame().legend.get(index).cloned() else {
            return;
        };
        match &self.focus {
            FocusState::Range(current) if current.same_range(&bucket) => {
                log::debug!("range [{}, {}) released", bucket.floor, bucket.ceiling);
                self.focus = FocusState::None;
                fx.push(Effect::ClearRangeFilter);
            }
            focus => {
                if let FocusState::Key(r) = focus {
                    let r = *r;
                    fx.push(Effect::ClearSeriesHighlight);
                    fx.push(Effect::Cancelled(r));
                }
                log::debug!("range [{}, {}) focused", bucket.floor, bucket.ceiling);
                self.focus = FocusState::Range(bucket.clone());
                self.preview = None;
                fx.push(Effect::ClearRangeFilter);
                fx.push(Effect::ApplyRangeFilter(bucket));
            }
        }
    }

    fn reapply_focus(&self, fx: &mut Effects) {
        match &self.focus {
            FocusState::None => {}
            FocusState::Key(r) => {
                fx.push(Effect::ClearSeriesHighlight);
                fx.push(Effect::HighlightSeries(r.series));
            }
            FocusState::Range(b) => {
                fx.push(Effect::ClearRangeFilter);
                fx.push(Effect::ApplyRangeFilter(b.clone()));
            }
        }
    }

    /// The range currently filtering markers: the focused one, else the hovered one.
    pub fn active_range(&self) -> Option<&LegendBucket> {
        match &self.focus {
            FocusState::Range(b) => Some(b),
            _ => self.preview.as_ref(),
        }
    }

    /// Display opacity of a record's marker.
    ///
    /// Only ranked markers are filtered; the unchanged bucket keeps full opacity.
    pub fn marker_opacity(&self, record: &RankedRecord) -> f32 {
        let Some(range) = self.active_range() else {
            return 1.0;
        };
        match record.section() {
            Section::Positive | Section::Negative => {
                if range.contains(self.chart.metric().get(&record.value)) {
                    1.0
                } else {
                    DIMMED_OPACITY
                }
            }
            Section::Unchanged | Section::Unplaced => 1.0,
        }
    }

    /// Whether a series is currently focused.
    pub fn is_focused(&self, series: usize) -> bool {
        matches!(&self.focus, FocusState::Key(r) if r.series == series)
    }

    /// Delivers the callback effects to a handler.
    pub fn dispatch(&self, effects: &Effects, handler: &mut impl ChartHandler) {
        let frame = self.chart.frame();
        for effect in effects {
            match effect {
                Effect::Hovered(r) => {
                    if let Some(record) = frame.record(*r) {
                        handler.on_hover(record);
                    }
                }
                Effect::Clicked(r) => {
                    if let Some(record) = frame.record(*r) {
                        handler.on_click(record);
                    }
                }
                Effect::Cancelled(r) => {
                    if let Some(record) = frame.record(*r) {
                        handler.on_cancel(record);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::dataset::Row;
    use crate::options::ChartOptions;
    use rankflow_text::HeuristicTextMeasurer;

    fn controller(options: ChartOptions) -> InteractionController<HeuristicTextMeasurer> {
        let rows = vec![
            Row::new().with("t", "P1").with("A", 10.0).with("B", 20.0).with("C", 7.0),
            Row::new().with("t", "P2").with("A", 15.0).with("B", 5.0).with("C", 7.0),
            Row::new().with("t", "P3").with("A", 12.0).with("B", 9.0).with("C", 8.0),
        ];
        let chart =
            BumpChart::from_rows(&rows, options, Size::new(600.0, 400.0), HeuristicTextMeasurer)
                .unwrap();
        InteractionController::new(chart)
    }

    #[derive(Default)]
    struct Log(Vec<String>);

    impl ChartHandler for Log {
        fn on_hover(&mut self, r: &RankedRecord) {
            self.0.push(alloc::format!("hover {}", r.value.key));
        }
        fn on_click(&mut self, r: &RankedRecord) {
            self.0.push(alloc::format!("click {}", r.value.key));
        }
        fn on_cancel(&mut self, r: &RankedRecord) {
            self.0.push(alloc::format!("cancel {}", r.value.key));
        }
    }

    #[test]
    fn hover_shows_tooltip_and_highlights_series() {
        let mut c = controller(ChartOptions::default());
        let fx = c.handle_event(Event::MarkerEnter(RecordRef::new(0, 0)));
        assert_eq!(fx[0], Effect::HighlightSeries(0));
        assert!(matches!(&fx[1], Effect::ShowTooltip(t, _) if t.lines[1] == "A"));
        assert_eq!(fx[2], Effect::Hovered(RecordRef::new(0, 0)));

        let fx = c.handle_event(Event::MarkerLeave(RecordRef::new(0, 0)));
        assert_eq!(fx.as_slice(), &[Effect::ClearSeriesHighlight, Effect::HideTooltip]);
    }

    #[test]
    fn focus_persists_through_hover() {
        let mut c = controller(ChartOptions::default());
        c.handle_event(Event::MarkerClick(RecordRef::new(0, 1)));
        assert!(c.is_focused(1));
        let fx = c.handle_event(Event::MarkerEnter(RecordRef::new(1, 0)));
        assert!(!fx.contains(&Effect::HighlightSeries(0)));
        let fx = c.handle_event(Event::MarkerLeave(RecordRef::new(1, 0)));
        assert_eq!(fx.as_slice(), &[Effect::HideTooltip]);
    }

    #[test]
    fn clicking_toggles_and_replaces_key_focus() {
        let mut c = controller(ChartOptions::default());
        let mut log = Log::default();

        let fx = c.handle_event(Event::MarkerClick(RecordRef::new(0, 0)));
        c.dispatch(&fx, &mut log);
        let fx = c.handle_event(Event::MarkerClick(RecordRef::new(1, 1)));
        c.dispatch(&fx, &mut log);
        assert!(c.is_focused(1));
        // Another marker of the same series releases the focus.
        let fx = c.handle_event(Event::MarkerClick(RecordRef::new(0, 1)));
        c.dispatch(&fx, &mut log);
        assert_eq!(c.focus(), &FocusState::None);
        assert_eq!(log.0, vec!["click A", "click B", "cancel B"]);
    }

    #[test]
    fn legend_focus_cancels_key_focus() {
        let mut c = controller(ChartOptions::default());
        c.handle_event(Event::MarkerClick(RecordRef::new(0, 0)));
        let fx = c.handle_event(Event::LegendClick(0));
        assert_eq!(fx[0], Effect::ClearSeriesHighlight);
        assert_eq!(fx[1], Effect::Cancelled(RecordRef::new(0, 0)));
        assert!(matches!(c.focus(), FocusState::Range(_)));

        // And back: a marker click clears the range first.
        let fx = c.handle_event(Event::MarkerClick(RecordRef::new(0, 2)));
        assert_eq!(fx[0], Effect::ClearRangeFilter);
        assert!(c.is_focused(2));
    }

    #[test]
    fn range_filter_dims_markers_outside() {
        let mut c = controller(ChartOptions::default());
        let bucket = c.chart().frame().legend.get(0).cloned().unwrap();
        c.handle_event(Event::LegendClick(0));
        let frame = c.chart().frame().clone();
        for period in &frame.ranking.periods {
            for record in &period.records {
                let expected = match record.section() {
                    Section::Positive | Section::Negative => {
                        if bucket.contains(c.chart().metric().get(&record.value)) {
                            1.0
                        } else {
                            DIMMED_OPACITY
                        }
                    }
                    _ => 1.0,
                };
                assert_eq!(c.marker_opacity(record), expected);
            }
        }
        c.handle_event(Event::LegendClick(0));
        assert!(c.active_range().is_none());
    }

    #[test]
    fn legend_hover_previews_until_leave() {
        let mut c = controller(ChartOptions::default());
        let fx = c.handle_event(Event::LegendEnter(1));
        assert!(matches!(fx[0], Effect::ApplyRangeFilter(_)));
        assert!(c.active_range().is_some());
        c.handle_event(Event::LegendLeave(1));
        assert!(c.active_range().is_none());
    }

    #[test]
    fn clicks_ignored_without_click_action() {
        let mut c = controller(ChartOptions::default().with_click_action(ClickAction::None));
        assert!(c.handle_event(Event::MarkerClick(RecordRef::new(0, 0))).is_empty());
        assert!(c.handle_event(Event::LegendClick(0)).is_empty());
        assert!(c.handle_event(Event::BackgroundClick).is_empty());
        assert_eq!(c.focus(), &FocusState::None);
    }

    #[test]
    fn background_click_clears_focus() {
        let mut c = controller(ChartOptions::default());
        c.handle_event(Event::MarkerClick(RecordRef::new(0, 0)));
        let fx = c.handle_event(Event::BackgroundClick);
        assert_eq!(
            fx.as_slice(),
            &[Effect::ClearSeriesHighlight, Effect::ClearRangeFilter]
        );
        assert_eq!(c.focus(), &FocusState::None);
    }

    #[test]
    fn level_change_reapplies_focus_and_resets() {
        let mut c = controller(ChartOptions::default());
        c.handle_event(Event::MarkerClick(RecordRef::new(0, 0)));
        let fx = c.handle_event(Event::SetLevel(3.0));
        assert_eq!(
            fx.as_slice(),
            &[
                Effect::Rerender,
                Effect::ClearSeriesHighlight,
                Effect::HighlightSeries(0)
            ]
        );
        assert_eq!(c.level(), 3.0);
        c.handle_event(Event::ResetLevel);
        assert_eq!(c.level(), c.chart().default_level());
    }

    #[test]
    fn column_hover() {
        let mut c = controller(ChartOptions::default());
        assert_eq!(
            c.handle_event(Event::ColumnEnter(1)).as_slice(),
            &[Effect::HighlightColumn(Some(1))]
        );
        assert_eq!(
            c.handle_event(Event::PlotLeave).as_slice(),
            &[Effect::HighlightColumn(None)]
        );
    }
}
