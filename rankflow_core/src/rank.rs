// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ranking and partitioning of each period around the threshold level.
//!
//! Every period is sorted by descending metric value and split into:
//! - a **positive** partition (`value >= level`), ranked `1..n`,
//! - a **negative** partition (`value < level`), ranked `-1..-n`,
//! - optionally an **unchanged** bucket (zero growth) when isolating unchanged members.
//!
//! `pos` numbers the visible dot column of a period: positive members first, then
//! negative members, contiguous from 0.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::num::NonZeroI32;

use crate::metric::{Metric, MetricPeriod, MetricTable, ValueRecord};

/// Inputs that select how a period is ranked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankParams {
    /// Metric read from each record.
    pub metric: Metric,
    /// Threshold separating the positive and negative partitions.
    pub level: f64,
    /// Whether zero-growth members are moved into their own bucket.
    pub isolate_unchanged: bool,
}

/// Running global extents over one full ranking pass.
///
/// All bounds start at zero. Updates follow an `if .. else if ..` chain, so a single value
/// can extend at most one bound per comparison. This is legacy behaviour that the layout
/// depends on and must not be "fixed" to independent min/max tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extents {
    /// Minimum over positive-partition values.
    pub p_min: f64,
    /// Maximum over positive-partition values (`+inf` is skipped).
    pub p_max: f64,
    /// Minimum over negative-partition values.
    pub n_min: f64,
    /// Maximum over negative-partition values.
    pub n_max: f64,
    /// Minimum assigned rank.
    pub r_min: i32,
    /// Maximum assigned rank.
    pub r_max: i32,
}

impl Extents {
    fn note_positive(&mut self, v: f64) {
        if v != f64::INFINITY && v > self.p_max {
            self.p_max = v;
        } else if v < self.p_min {
            self.p_min = v;
        }
    }

    fn note_negative(&mut self, v: f64) {
        if v > self.n_max {
            self.n_max = v;
        } else if v < self.n_min {
            self.n_min = v;
        }
    }

    fn note_rank(&mut self, rank: i32) {
        if rank > self.r_max {
            self.r_max = rank;
        } else if rank < self.r_min {
            self.r_min = rank;
        }
    }
}

/// Where a record sits in its period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Member of the positive (`rank > 0`) or negative (`rank < 0`) partition.
    Ranked {
        /// Signed rank; never zero.
        rank: NonZeroI32,
        /// Slot index within the period's visible dot column.
        pos: usize,
    },
    /// Isolated zero-growth member.
    Unchanged {
        /// Index within the period's unchanged bucket, in sorted order.
        index: usize,
    },
    /// A value that compares neither above nor below the level (e.g. `NaN`).
    Unplaced,
}

/// The partition a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// At or above the level.
    Positive,
    /// Below the level.
    Negative,
    /// Isolated zero-growth member.
    Unchanged,
    /// Not drawn.
    Unplaced,
}

/// A [`ValueRecord`] with its assigned slot.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedRecord {
    /// The underlying metric record.
    pub value: ValueRecord,
    /// Assigned rank/position.
    pub slot: Slot,
}

impl RankedRecord {
    /// Returns the signed rank, if the record is ranked.
    pub fn rank(&self) -> Option<i32> {
        match self.slot {
            Slot::Ranked { rank, .. } => Some(rank.get()),
            _ => None,
        }
    }

    /// Returns the column slot index, if the record is ranked.
    pub fn pos(&self) -> Option<usize> {
        match self.slot {
            Slot::Ranked { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// Returns the partition of this record.
    pub fn section(&self) -> Section {
        match self.slot {
            Slot::Ranked { rank, .. } if rank.get() > 0 => Section::Positive,
            Slot::Ranked { .. } => Section::Negative,
            Slot::Unchanged { .. } => Section::Unchanged,
            Slot::Unplaced => Section::Unplaced,
        }
    }
}

/// One ranked period.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedPeriod {
    /// Input row index.
    pub period: usize,
    /// Tick label.
    pub tick: Arc<str>,
    /// Records sorted by descending metric value (series order breaks ties).
    pub records: Vec<RankedRecord>,
    /// Size of the positive partition.
    pub positive_count: usize,
    /// Size of the negative partition.
    pub negative_count: usize,
    /// Size of the unchanged bucket (always 0 when not isolating).
    pub unchanged_count: usize,
    /// Members whose value is below the level, unchanged members included.
    pub below_level: usize,
    /// Number of dot rows the period's column is pushed down to align the level line.
    pub column_offset: usize,
}

impl RankedPeriod {
    /// Looks up the record of a series.
    pub fn record(&self, series: usize) -> Option<&RankedRecord> {
        self.records.iter().find(|r| r.value.series == series)
    }

    /// Returns the records of one section in sorted order.
    pub fn section(&self, section: Section) -> impl Iterator<Item = &RankedRecord> {
        self.records.iter().filter(move |r| r.section() == section)
    }
}

/// The ranking of every charted period plus the extents gathered along the way.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    /// Parameters the ranking was computed with.
    pub params: RankParams,
    /// Ranked periods in input order.
    pub periods: Vec<RankedPeriod>,
    /// Extents gathered while ranking.
    pub extents: Extents,
    /// Number of series per period.
    pub series_count: usize,
    /// Largest zero-growth count of any charted period.
    pub max_unchanged_count: usize,
}

impl Ranking {
    /// Ranks every period of `table` starting from fresh (zero) extents.
    pub fn rank_all(table: &MetricTable, params: &RankParams) -> Self {
        let mut extents = Extents::default();
        let periods = table
            .periods
            .iter()
            .map(|p| rank_period(p, params, &mut extents))
            .collect();
        Self {
            params: *params,
            periods,
            extents,
            series_count: table.series_count,
            max_unchanged_count: table.max_unchanged_count,
        }
    }

    /// Looks up a record by period position (not input row) and series.
    pub fn record(&self, period: usize, series: usize) -> Option<&RankedRecord> {
        self.periods.get(period)?.record(series)
    }
}

/// Ranks one period, extending `extents` as members are accepted into a partition.
pub fn rank_period(
    period: &MetricPeriod,
    params: &RankParams,
    extents: &mut Extents,
) -> RankedPeriod {
    let metric = params.metric;
    let level = params.level;
    let isolate = params.isolate_unchanged;

    let mut sorted: Vec<&ValueRecord> = period.values.iter().collect();
    sorted.sort_by(|a, b| metric.get(b).total_cmp(&metric.get(a)));

    let mut slots = alloc::vec![Slot::Unplaced; sorted.len()];
    let mut pos = 0;

    let mut positive_count = 0;
    for (i, d) in sorted.iter().enumerate() {
        let v = metric.get(d);
        let accepted = if isolate {
            !d.is_unchanged() && v >= level
        } else {
            v >= level
        };
        if !accepted {
            continue;
        }
        extents.note_positive(v);
        positive_count += 1;
        let rank = rank_value(positive_count, 1);
        extents.note_rank(rank.get());
        slots[i] = Slot::Ranked { rank, pos };
        pos += 1;
    }

    let mut negative_count = 0;
    for (i, d) in sorted.iter().enumerate() {
        let v = metric.get(d);
        let accepted = if isolate {
            !d.is_unchanged() && v < level
        } else {
            v < level
        };
        if !accepted {
            continue;
        }
        extents.note_negative(v);
        negative_count += 1;
        let rank = rank_value(negative_count, -1);
        extents.note_rank(rank.get());
        slots[i] = Slot::Ranked { rank, pos };
        pos += 1;
    }

    let mut unchanged_count = 0;
    let mut below_level = 0;
    let mut below_changed = 0;
    for (i, d) in sorted.iter().enumerate() {
        let below = metric.get(d) < level;
        if below {
            below_level += 1;
        }
        if isolate && d.is_unchanged() {
            slots[i] = Slot::Unchanged {
                index: unchanged_count,
            };
            unchanged_count += 1;
        } else if below {
            below_changed += 1;
        }
    }

    let column_offset = if isolate {
        below_changed + unchanged_count
    } else {
        below_level
    };

    let records = sorted
        .into_iter()
        .zip(slots)
        .map(|(d, slot)| RankedRecord {
            value: d.clone(),
            slot,
        })
        .collect();

    RankedPeriod {
        period: period.period,
        tick: period.tick.clone(),
        records,
        positive_count,
        negative_count,
        unchanged_count,
        below_level,
        column_offset,
    }
}

fn rank_value(count: usize, sign: i32) -> NonZeroI32 {
    let magnitude = i32::try_from(count).unwrap_or(i32::MAX).max(1);
    NonZeroI32::new(sign * magnitude).unwrap_or(NonZeroI32::MIN)
}
