// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-period metric derivation (value, growth, rate).

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::dataset::Dataset;

/// The metric markers are ranked by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// The raw value of the period.
    Value,
    /// The difference to the previous period.
    #[default]
    Growth,
    /// Growth relative to the previous period.
    Rate,
}

impl Metric {
    /// Reads the active metric from a record.
    pub fn get(self, record: &ValueRecord) -> f64 {
        match self {
            Self::Value => record.number,
            Self::Growth => record.growth,
            Self::Rate => record.rate,
        }
    }

    /// Index of the first input row that produces chart data.
    ///
    /// Growth and rate have no predecessor for row 0, so it is dropped.
    pub fn first_period(self) -> usize {
        match self {
            Self::Value => 0,
            Self::Growth | Self::Rate => 1,
        }
    }
}

/// One series in one period, with its derived metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRecord {
    /// Input row index (0 is the first row even when it was dropped).
    pub period: usize,
    /// Tick label of the period.
    pub tick: Arc<str>,
    /// Series index into [`Dataset::keys`].
    pub series: usize,
    /// Series key.
    pub key: Arc<str>,
    /// Raw value.
    pub number: f64,
    /// `number` minus the previous period's number (previous is 0 for row 0).
    pub growth: f64,
    /// `growth / previous`, or 0 when either is 0.
    pub rate: f64,
}

impl ValueRecord {
    /// Whether this record did not change since the previous period.
    pub fn is_unchanged(&self) -> bool {
        self.growth == 0.0
    }
}

/// Derived records of a single period, in series order.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricPeriod {
    /// Input row index.
    pub period: usize,
    /// Tick label.
    pub tick: Arc<str>,
    /// One record per series.
    pub values: Vec<ValueRecord>,
}

/// Metric records for every charted period.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricTable {
    /// Metric the table was computed for.
    pub metric: Metric,
    /// Charted periods in input order.
    pub periods: Vec<MetricPeriod>,
    /// Number of series per period.
    pub series_count: usize,
    /// The largest number of zero-growth series found in any charted period.
    pub max_unchanged_count: usize,
    /// The default threshold level: the global mean for [`Metric::Value`], else 0.
    pub default_level: f64,
}

impl MetricTable {
    /// Derives `{number, growth, rate}` for every series in every charted period.
    pub fn compute(data: &Dataset, metric: Metric) -> Self {
        let keys = data.keys();
        let rows = data.row_count();
        let start = metric.first_period();

        let default_level = match metric {
            Metric::Value => mean(data),
            Metric::Growth | Metric::Rate => 0.0,
        };

        let mut max_unchanged_count = 0;
        let mut periods = Vec::with_capacity(rows.saturating_sub(start));
        for row in start..rows {
            let tick = data.tick(row).cloned().unwrap_or_else(|| Arc::from(""));
            let mut unchanged = 0;
            let values: Vec<ValueRecord> = keys
                .iter()
                .enumerate()
                .map(|(series, key)| {
                    let number = data.value(row, series).unwrap_or(f64::NAN);
                    let prev = if row == 0 {
                        0.0
                    } else {
                        data.value(row - 1, series).unwrap_or(f64::NAN)
                    };
                    let growth = number - prev;
                    if growth == 0.0 {
                        unchanged += 1;
                    }
                    ValueRecord {
                        period: row,
                        tick: tick.clone(),
                        series,
                        key: key.clone(),
                        number,
                        growth,
                        rate: growth_rate(growth, prev),
                    }
                })
                .collect();
            max_unchanged_count = max_unchanged_count.max(unchanged);
            periods.push(MetricPeriod {
                period: row,
                tick,
                values,
            });
        }

        Self {
            metric,
            periods,
            series_count: keys.len(),
            max_unchanged_count,
            default_level,
        }
    }

    /// Number of charted periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether there are no charted periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// `growth / prev`, defined as 0 when either side is 0 so no non-finite rate escapes.
pub fn growth_rate(growth: f64, prev: f64) -> f64 {
    if growth == 0.0 || prev == 0.0 {
        0.0
    } else {
        growth / prev
    }
}

fn mean(data: &Dataset) -> f64 {
    let n = data.row_count() * data.series_count();
    if n == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for row in 0..data.row_count() {
        for series in 0..data.series_count() {
            total += data.value(row, series).unwrap_or(0.0);
        }
    }
    total / n as f64
}
