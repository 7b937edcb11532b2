// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ranked bump chart demo: renders a sample chart to SVG and replays a scripted session.

mod svg;

use rankflow_core::{
    BumpChart, ChartHandler, ChartOptions, Event, HeuristicTextMeasurer,
    InteractionController, Metric, RankedRecord, RecordRef, Row, Size, TickInterval, TickSpec,
};

#[derive(Debug, Default)]
struct Printer;

impl ChartHandler for Printer {
    fn on_hover(&mut self, record: &RankedRecord) {
        println!("  hover   {} @ {}", record.value.key, record.value.tick);
    }

    fn on_click(&mut self, record: &RankedRecord) {
        println!("  focus   {} @ {}", record.value.key, record.value.tick);
    }

    fn on_cancel(&mut self, record: &RankedRecord) {
        println!("  release {} @ {}", record.value.key, record.value.tick);
    }
}

fn sample_rows() -> Vec<Row> {
    let series = ["Oslo", "Lima", "Pune", "Kobe", "Graz", "Nice", "Cork", "Bern"];
    let values = [
        [120.0, 80.0, 64.0, 40.0, 33.0, 21.0, 18.0, 9.0],
        [131.0, 74.0, 64.0, 52.0, 30.0, 21.0, 25.0, 12.0],
        [128.0, 90.0, 70.0, 49.0, 30.0, 26.0, 19.0, 15.0],
        [140.0, 85.0, 88.0, 49.0, 41.0, 24.0, 19.0, 11.0],
        [152.0, 79.0, 93.0, 60.0, 38.0, 30.0, 22.0, 11.0],
        [149.0, 97.0, 91.0, 66.0, 45.0, 28.0, 29.0, 14.0],
    ];
    values
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let month = format!("2024-{:02}-01", i + 1);
            series
                .iter()
                .zip(row)
                .fold(Row::new().with("month", month), |r, (k, v)| r.with(*k, *v))
        })
        .collect()
}

fn main() {
    let options = ChartOptions::default()
        .with_metric(Metric::Growth)
        .with_slider(true)
        .with_tick(
            TickSpec::default()
                .with_name("month")
                .with_date_format("%Y-%m")
                .with_interval(TickInterval::Auto)
                .with_extractor(|t| t.get(..7).unwrap_or(t).to_string()),
        );
    let chart = match BumpChart::from_rows(
        &sample_rows(),
        options,
        Size::new(720.0, 420.0),
        HeuristicTextMeasurer,
    ) {
        Ok(chart) => chart,
        Err(err) => {
            eprintln!("cannot build chart: {err}");
            std::process::exit(1);
        }
    };
    let mut controller = InteractionController::new(chart);
    let mut overlay = svg::Overlay::default();
    let mut printer = Printer;

    let script = [
        Event::ColumnEnter(2),
        Event::MarkerEnter(RecordRef::new(2, 1)),
        Event::MarkerClick(RecordRef::new(2, 1)),
        Event::MarkerLeave(RecordRef::new(2, 1)),
        Event::LegendEnter(1),
        Event::LegendLeave(1),
        Event::LegendClick(0),
        Event::SetLevel(5.0),
        Event::LegendClick(0),
        Event::ResetLevel,
        Event::PlotLeave,
    ];

    for (step, event) in script.into_iter().enumerate() {
        println!("{event:?}");
        let effects = controller.handle_event(event);
        controller.dispatch(&effects, &mut printer);
        for effect in &effects {
            overlay.apply(effect);
            println!("  -> {effect:?}");
        }
        if step == 2 {
            write_svg("rankflow_demo_focus.svg", &svg::render(&controller, &overlay));
        }
    }

    write_svg("rankflow_demo.svg", &svg::render(&controller, &overlay));
}

fn write_svg(path: &str, svg: &str) {
    match std::fs::write(path, svg) {
        Ok(()) => println!("wrote {path}"),
        Err(err) => eprintln!("cannot write {path}: {err}"),
    }
}
