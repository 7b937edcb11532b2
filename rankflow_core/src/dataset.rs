// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input rows and the owned numeric dataset derived from them.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::IngestError;

/// A single input field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A numeric value.
    Number(f64),
    /// A textual value (tick labels, or numbers that still need coercion).
    Text(String),
}

impl Field {
    /// Coerces the field to a number.
    ///
    /// Text is trimmed and parsed; empty text is `0` and unparsable text is `NaN`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Returns the field as label text.
    pub fn to_label(&self) -> String {
        match self {
            Self::Number(v) => alloc::format!("{v}"),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One period of input: a tick field plus one value per series, in schema order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Field)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Field>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Returns the field names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl<N: Into<String>, V: Into<Field>> FromIterator<(N, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// An owned, ingested dataset: tick labels plus a row-major numeric matrix.
///
/// - `keys` are derived once from the first row minus the tick field, order preserved.
/// - `values[row][series]` are coerced numbers.
#[derive(Clone, Debug)]
pub struct Dataset {
    tick_field: String,
    keys: Vec<Arc<str>>,
    key_index: HashMap<Arc<str>, usize>,
    ticks: Vec<Arc<str>>,
    values: Vec<Vec<f64>>,
}

impl Dataset {
    /// Ingests `rows`.
    ///
    /// When `tick_field` is `None` the first column of the first row is the tick field.
    pub fn ingest(rows: &[Row], tick_field: Option<&str>) -> Result<Self, IngestError> {
        let first = rows.first().ok_or(IngestError::NoRows)?;
        let mut names: Vec<&str> = first.names().collect();

        let tick_field: String = match tick_field {
            None | Some("") => {
                if names.is_empty() {
                    return Err(IngestError::InvalidTickField(String::new()));
                }
                names.remove(0).into()
            }
            Some(name) => {
                let Some(index) = names.iter().position(|n| *n == name) else {
                    return Err(IngestError::InvalidTickField(name.into()));
                };
                names.remove(index);
                name.into()
            }
        };

        let keys: Vec<Arc<str>> = names.iter().map(|n| Arc::from(*n)).collect();
        let key_index = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();

        let mut ticks = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let tick = row
                .get(&tick_field)
                .ok_or_else(|| IngestError::MissingField {
                    row: r,
                    field: tick_field.clone(),
                })?;
            ticks.push(Arc::from(tick.to_label()));

            let mut out = Vec::with_capacity(keys.len());
            for key in &keys {
                let v = row.get(key).ok_or_else(|| IngestError::MissingField {
                    row: r,
                    field: String::from(&**key),
                })?;
                out.push(v.to_f64());
            }
            values.push(out);
        }

        log::debug!(
            "ingested {} rows x {} series (tick field {:?})",
            rows.len(),
            keys.len(),
            tick_field
        );

        Ok(Self {
            tick_field,
            keys,
            key_index,
            ticks,
            values,
        })
    }

    /// Returns the tick field name.
    pub fn tick_field(&self) -> &str {
        &self.tick_field
    }

    /// Returns the ordered series keys.
    pub fn keys(&self) -> &[Arc<str>] {
        &self.keys
    }

    /// Returns the number of series.
    pub fn series_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of rows (periods before any metric-specific dropping).
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the series index for a key name, if present.
    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// Returns the tick label of a row.
    pub fn tick(&self, row: usize) -> Option<&Arc<str>> {
        self.ticks.get(row)
    }

    /// Returns the coerced value for a row/series if both exist.
    pub fn value(&self, row: usize, series: usize) -> Option<f64> {
        self.values.get(row)?.get(series).copied()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("t", "P1").with("A", 10.0).with("B", "20"),
            Row::new().with("t", "P2").with("A", 15.0).with("B", 5.0),
        ]
    }

    #[test]
    fn tick_field_defaults_to_first_column() {
        let ds = Dataset::ingest(&rows(), None).unwrap();
        assert_eq!(ds.tick_field(), "t");
        assert_eq!(ds.keys().len(), 2);
        assert_eq!(&*ds.keys()[0], "A");
        assert_eq!(&*ds.keys()[1], "B");
        assert_eq!(ds.value(0, 1), Some(20.0));
        assert_eq!(ds.tick(1).map(|t| &**t), Some("P2"));
    }

    #[test]
    fn explicit_tick_field_is_removed_from_keys() {
        let ds = Dataset::ingest(&rows(), Some("B")).unwrap();
        assert_eq!(ds.tick_field(), "B");
        assert_eq!(ds.series_count(), 2);
        assert_eq!(ds.series_index("t"), Some(0));
        assert_eq!(ds.series_index("A"), Some(1));
        // Tick labels keep their textual form; "t" becomes a NaN series.
        assert_eq!(ds.tick(0).map(|t| &**t), Some("20"));
        assert!(ds.value(0, 0).unwrap().is_nan());
    }

    #[test]
    fn unknown_tick_field_is_an_error() {
        let err = Dataset::ingest(&rows(), Some("date")).unwrap_err();
        assert_eq!(err, IngestError::InvalidTickField("date".into()));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(Dataset::ingest(&[], None).unwrap_err(), IngestError::NoRows);
    }

    #[test]
    fn missing_series_field_is_reported_with_row() {
        let rows = vec![
            Row::new().with("t", "P1").with("A", 1.0).with("B", 2.0),
            Row::new().with("t", "P2").with("A", 1.0),
        ];
        let err = Dataset::ingest(&rows, None).unwrap_err();
        assert_eq!(
            err,
            IngestError::MissingField {
                row: 1,
                field: "B".into()
            }
        );
    }

    #[test]
    fn text_coercion_matches_numeric_rules() {
        assert_eq!(Field::from(" 12.5 ").to_f64(), 12.5);
        assert_eq!(Field::from("").to_f64(), 0.0);
        assert!(Field::from("n/a").to_f64().is_nan());
    }
}
