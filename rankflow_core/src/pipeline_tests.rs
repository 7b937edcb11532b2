// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};

use crate::{
    BumpChart, ChartOptions, Dataset, Frame, HeuristicTextMeasurer, Metric, MetricTable,
    RankParams, Ranking, Row, Section, Size, Slot, compute_shift,
};

/// A dataset with ties, zero baselines, unchanged members and mixed signs.
fn rows() -> Vec<Row> {
    vec![
        Row::new()
            .with("year", "2019")
            .with("A", 10.0)
            .with("B", 20.0)
            .with("C", 0.0)
            .with("D", 5.0)
            .with("E", 8.0),
        Row::new()
            .with("year", "2020")
            .with("A", 15.0)
            .with("B", 5.0)
            .with("C", 0.0)
            .with("D", 9.0)
            .with("E", 8.0),
        Row::new()
            .with("year", "2021")
            .with("A", 12.0)
            .with("B", 9.0)
            .with("C", 4.0)
            .with("D", 9.0)
            .with("E", 3.0),
        Row::new()
            .with("year", "2022")
            .with("A", 12.0)
            .with("B", 30.0)
            .with("C", 1.0)
            .with("D", 2.0)
            .with("E", 6.0),
        Row::new()
            .with("year", "2023")
            .with("A", 20.0)
            .with("B", "")
            .with("C", 1.0)
            .with("D", 7.0)
            .with("E", 6.0),
    ]
}

fn table(metric: Metric) -> MetricTable {
    MetricTable::compute(&Dataset::ingest(&rows(), None).unwrap(), metric)
}

fn params(metric: Metric, level: f64, isolate: bool) -> RankParams {
    RankParams {
        metric,
        level,
        isolate_unchanged: isolate,
    }
}

fn all_params() -> Vec<RankParams> {
    let mut out = Vec::new();
    for metric in [Metric::Value, Metric::Growth, Metric::Rate] {
        for level in [-3.0, 0.0, 0.25, 6.0] {
            for isolate in [false, true] {
                out.push(params(metric, level, isolate));
            }
        }
    }
    out
}

#[test]
fn partition_ranks_are_contiguous_and_never_zero() {
    for p in all_params() {
        let ranking = Ranking::rank_all(&table(p.metric), &p);
        for period in &ranking.periods {
            let mut pos: Vec<i32> = period
                .section(Section::Positive)
                .filter_map(|r| r.rank())
                .collect();
            let mut neg: Vec<i32> = period
                .section(Section::Negative)
                .filter_map(|r| r.rank())
                .collect();
            pos.sort_unstable();
            neg.sort_unstable_by(|a, b| b.cmp(a));
            let n_pos = i32::try_from(pos.len()).unwrap();
            let n_neg = i32::try_from(neg.len()).unwrap();
            assert_eq!(pos, (1..=n_pos).collect::<Vec<_>>(), "{p:?}");
            assert_eq!(neg, (1..=n_neg).map(|r| -r).collect::<Vec<_>>(), "{p:?}");
            assert!(period.records.iter().all(|r| r.rank() != Some(0)));
        }
    }
}

#[test]
fn positions_are_contiguous_from_zero() {
    for p in all_params() {
        let ranking = Ranking::rank_all(&table(p.metric), &p);
        for period in &ranking.periods {
            let mut pos: Vec<usize> = period.records.iter().filter_map(|r| r.pos()).collect();
            pos.sort_unstable();
            assert_eq!(pos, (0..pos.len()).collect::<Vec<_>>(), "{p:?}");
            // Positive members come first.
            let max_pos = period.section(Section::Positive).filter_map(|r| r.pos()).max();
            let min_neg = period.section(Section::Negative).filter_map(|r| r.pos()).min();
            if let (Some(a), Some(b)) = (max_pos, min_neg) {
                assert!(a < b);
            }
        }
    }
}

#[test]
fn isolated_unchanged_members_are_never_ranked() {
    for p in all_params().into_iter().filter(|p| p.isolate_unchanged) {
        let ranking = Ranking::rank_all(&table(p.metric), &p);
        for period in &ranking.periods {
            for r in &period.records {
                if r.value.growth == 0.0 {
                    assert!(matches!(r.slot, Slot::Unchanged { .. }));
                }
            }
            let indices: Vec<usize> = period
                .records
                .iter()
                .filter_map(|r| match r.slot {
                    Slot::Unchanged { index } => Some(index),
                    _ => None,
                })
                .collect();
            assert_eq!(indices, (0..period.unchanged_count).collect::<Vec<_>>());
        }
    }
}

#[test]
fn rate_is_zero_for_zero_growth_or_zero_previous() {
    let t = table(Metric::Rate);
    let data = Dataset::ingest(&rows(), None).unwrap();
    for period in &t.periods {
        for v in &period.values {
            let prev = data.value(v.period - 1, v.series).unwrap();
            if v.growth == 0.0 || prev == 0.0 {
                assert_eq!(v.rate, 0.0, "{v:?}");
            }
        }
    }
}

#[test]
fn ranking_is_deterministic() {
    for p in all_params() {
        let t = table(p.metric);
        assert_eq!(Ranking::rank_all(&t, &p), Ranking::rank_all(&t, &p));
    }
}

#[test]
fn level_round_trip_restores_everything() {
    let mut chart = BumpChart::new(
        &Dataset::ingest(&rows(), None).unwrap(),
        ChartOptions::default(),
        Size::new(640.0, 480.0),
        HeuristicTextMeasurer,
    );
    let before = chart.frame().clone();
    chart.recompute(4.5);
    assert_ne!(chart.frame().ranking, before.ranking);
    chart.recompute(before.level);
    let after = chart.frame();
    assert_eq!(after.ranking.extents, before.ranking.extents);
    assert_eq!(compute_shift(&after.ranking), compute_shift(&before.ranking));
    assert_eq!(after.ranking, before.ranking);
    assert_eq!(after.layout, before.layout);
    assert_eq!(after.markers, before.markers);
}

#[test]
fn legend_buckets_are_contiguous_for_every_level() {
    for metric in [Metric::Value, Metric::Growth, Metric::Rate] {
        let mut chart = BumpChart::new(
            &Dataset::ingest(&rows(), None).unwrap(),
            ChartOptions::default().with_metric(metric),
            Size::new(640.0, 480.0),
            HeuristicTextMeasurer,
        );
        for level in [-5.0, 0.0, 2.0, 8.0] {
            chart.recompute(level);
            let legend = &chart.frame().legend;
            for w in legend.buckets.windows(2) {
                assert_eq!(w[0].ceiling, w[1].floor, "{metric:?} at {level}");
            }
            for b in &legend.buckets {
                assert!(b.floor <= b.ceiling, "{metric:?} at {level}");
            }
        }
    }
}

#[test]
fn growth_scenario() {
    let rows = vec![
        Row::new().with("t", "P1").with("A", 10.0).with("B", 20.0),
        Row::new().with("t", "P2").with("A", 15.0).with("B", 5.0),
    ];
    let t = MetricTable::compute(&Dataset::ingest(&rows, None).unwrap(), Metric::Growth);
    let ranking = Ranking::rank_all(&t, &params(Metric::Growth, 0.0, true));
    assert_eq!(ranking.periods.len(), 1);
    let p = &ranking.periods[0];
    assert_eq!(p.record(0).unwrap().value.growth, 5.0);
    assert_eq!(p.record(1).unwrap().value.growth, -15.0);
    assert_eq!(p.record(0).unwrap().rank(), Some(1));
    assert_eq!(p.record(1).unwrap().rank(), Some(-1));
}

#[test]
fn unchanged_scenario() {
    let rows = vec![
        Row::new().with("t", "P1").with("A", 3.0).with("B", 4.0),
        Row::new().with("t", "P2").with("A", 3.0).with("B", 6.0),
    ];
    let t = MetricTable::compute(&Dataset::ingest(&rows, None).unwrap(), Metric::Growth);
    let ranking = Ranking::rank_all(&t, &params(Metric::Growth, 0.0, true));
    let a = ranking.record(0, 0).unwrap();
    assert_eq!(a.value.growth, 0.0);
    assert_eq!(a.value.rate, 0.0);
    assert_eq!(a.section(), Section::Unchanged);
    assert_eq!(ranking.periods[0].positive_count + ranking.periods[0].negative_count, 1);
}

#[test]
fn level_above_everything_scenario() {
    let t = table(Metric::Value);
    let ranking = Ranking::rank_all(&t, &params(Metric::Value, 1000.0, false));
    for period in &ranking.periods {
        assert_eq!(period.positive_count, 0);
        let ranks: Vec<i32> = period.records.iter().filter_map(|r| r.rank()).collect();
        let n = i32::try_from(ranks.len()).unwrap();
        assert_eq!(ranks, (1..=n).map(|r| -r).collect::<Vec<_>>());
    }
}

#[test]
fn markers_align_level_line_across_periods() {
    let chart = BumpChart::new(
        &Dataset::ingest(&rows(), None).unwrap(),
        ChartOptions::default().with_isolate_unchanged(false),
        Size::new(640.0, 480.0),
        HeuristicTextMeasurer,
    );
    let f = chart.frame();
    let d = f.layout.dot_diameter;
    // The first negative marker of every period sits on the same row.
    let mut rows_below: Vec<f64> = f
        .markers
        .iter()
        .filter(|m| m.section == Section::Negative)
        .filter(|m| f.record(m.record).and_then(|r| r.rank()) == Some(-1))
        .map(|m| m.center.y)
        .collect();
    rows_below.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    assert!(rows_below.len() <= 1, "{rows_below:?}");
    assert!(d > 0.0);
}

fn rect_points(r: Rect) -> [Point; 2] {
    [Point::new(r.x0, r.y0), Point::new(r.x1, r.y1)]
}

fn line_points(l: Line) -> [Point; 2] {
    [l.p0, l.p1]
}

/// Every coordinate a renderer reads from a frame.
fn frame_points(f: &Frame) -> Vec<Point> {
    let mut pts = Vec::new();
    for m in &f.markers {
        pts.push(m.center);
        pts.push(Point::new(m.radius, 0.0));
    }
    for t in &f.x_ticks {
        pts.push(t.anchor);
        pts.extend(line_points(t.guide));
    }
    pts.extend(f.rank_ticks.iter().map(|t| t.anchor));
    pts.extend(f.zero_line.into_iter().flat_map(line_points));
    for item in &f.legend_strip.items {
        pts.extend(rect_points(item.swatch));
        pts.extend(line_points(item.tick));
        pts.push(item.label_anchor);
    }
    pts.extend(f.unchanged_label.map(|l| l.anchor));
    if let Some(s) = &f.slider {
        pts.extend(rect_points(s.track));
        pts.push(Point::new(s.label_y, s.range.step));
    }
    for i in 0..f.ranking.periods.len() {
        pts.extend(rect_points(f.column_rect(i)));
    }
    pts
}

#[test]
fn constant_series_produce_finite_geometry() {
    let rows = vec![
        Row::new().with("t", "P1").with("A", 5.0).with("B", 5.0),
        Row::new().with("t", "P2").with("A", 5.0).with("B", 5.0),
        Row::new().with("t", "P3").with("A", 5.0).with("B", 5.0),
    ];
    for metric in [Metric::Value, Metric::Growth, Metric::Rate] {
        for isolate in [false, true] {
            let chart = BumpChart::from_rows(
                &rows,
                ChartOptions::default()
                    .with_metric(metric)
                    .with_isolate_unchanged(isolate),
                Size::new(400.0, 300.0),
                HeuristicTextMeasurer,
            )
            .unwrap();
            let frame = chart.frame();
            assert!(frame.slider.is_some());
            for p in frame_points(frame) {
                assert!(p.is_finite(), "{metric:?} isolate={isolate}: {p:?}");
            }
        }
    }
}
