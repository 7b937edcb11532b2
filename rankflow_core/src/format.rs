// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for legend, slider and tooltip labels.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Formats `v` with `digits` significant digits and an SI prefix (`1.5k`, `500m`, `20`).
///
/// Insignificant trailing zeros are kept (`5.0`, `0.0`), and negative values use an ASCII
/// `-`. Exponents beyond the yotta/yocto range reuse the outermost prefix.
pub fn format_si(v: f64, digits: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let digits = digits.max(1);
    let (negative, coefficient, exponent) = decimal_parts(v, digits);
    let prefix_exponent = exponent.div_euclid(3).clamp(-8, 8);
    // Number of coefficient digits before the decimal point once the prefix is applied.
    let i = exponent - prefix_exponent * 3 + 1;
    let n = i32::try_from(coefficient.len()).unwrap_or(i32::MAX);

    let mut body = if i == n {
        coefficient
    } else if i > n {
        let mut s = coefficient;
        s.extend(core::iter::repeat_n('0', to_usize(i - n)));
        s
    } else if i > 0 {
        let (int, frac) = coefficient.split_at(to_usize(i));
        format!("{int}.{frac}")
    } else {
        let digits = i32::try_from(digits).unwrap_or(i32::MAX);
        let more = to_usize(digits.saturating_add(i - 1));
        let (_, rest, _) = decimal_parts(v, more.max(1));
        let mut s = String::from("0.");
        s.extend(core::iter::repeat_n('0', to_usize(-i)));
        s.push_str(&rest);
        s
    };
    let sign = if negative && body.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    body.push_str(SI_PREFIXES[to_usize(prefix_exponent + 8)]);
    format!("{sign}{body}")
}

/// Formats `v` with a fixed number of decimals.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    format!("{v:.decimals$}")
}

/// Formats a ratio as a percentage number (`0.015` → `1.50` with two decimals), no `%` sign.
pub fn format_percent(v: f64, decimals: usize) -> String {
    format_fixed(v * 100.0, decimals)
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

fn to_usize(i: i32) -> usize {
    usize::try_from(i).unwrap_or(0)
}

/// Splits `v` into (sign, significant digits, decimal exponent) with `digits` digits.
fn decimal_parts(v: f64, digits: usize) -> (bool, String, i32) {
    let precision = digits - 1;
    let s = format!("{:.precision$e}", v.abs());
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let coefficient: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent = exponent.parse::<i32>().unwrap_or(0);
    (v.is_sign_negative(), coefficient, exponent)
}
