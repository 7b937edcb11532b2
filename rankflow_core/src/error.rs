// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ingestion errors.

extern crate alloc;

use alloc::string::String;

/// Errors returned when ingesting input rows into a [`crate::Dataset`].
///
/// All of these are fatal for a render pass: nothing downstream of ingestion can run
/// without a valid schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// The input sequence contains no rows, so there is no schema to derive keys from.
    #[error("no input rows")]
    NoRows,
    /// An explicitly named tick field is not part of the first row's schema.
    #[error("invalid tick field: {0}")]
    InvalidTickField(String),
    /// A row lacks a field that the first row defines.
    #[error("row {row} is missing field {field:?}")]
    MissingField {
        /// Index of the offending row.
        row: usize,
        /// Name of the missing field.
        field: String,
    },
}
