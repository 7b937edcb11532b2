// Copyright 2025 the Rankflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker shapes.

use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// The shape drawn for every marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A circle of the dot radius.
    #[default]
    Circle,
    /// An axis-aligned square whose side is the dot diameter.
    Square,
}

impl Symbol {
    /// Flattening tolerance used for circle outlines.
    pub const TOLERANCE: f64 = 0.1;

    /// Returns the outline of a marker centred at `center` with the given radius.
    ///
    /// Both shapes share the same center so switching the shape never moves a marker.
    pub fn path(self, center: Point, radius: f64) -> BezPath {
        let r = radius.max(0.0);
        match self {
            Self::Circle => Circle::new(center, r).path_elements(Self::TOLERANCE).collect(),
            Self::Square => {
                Rect::new(center.x - r, center.y - r, center.x + r, center.y + r)
                    .path_elements(Self::TOLERANCE)
                    .collect()
            }
        }
    }
}
