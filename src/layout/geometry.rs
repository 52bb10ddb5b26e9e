// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A point in view coordinates: `x` grows with depth, `y` runs along the sibling axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { top: 10.0, right: 50.0, bottom: 10.0, left: 50.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Smallest box covering every point, grown by `margins` on each side.
    ///
    /// Returns `None` for an empty point set.
    pub fn covering(points: impl IntoIterator<Item = Point>, margins: Margins) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x - margins.left,
            y: min_y - margins.top,
            width: (max_x - min_x) + margins.left + margins.right,
            height: (max_y - min_y) + margins.top + margins.bottom,
        })
    }

    pub fn with_min_width(self, min_width: f64) -> Self {
        Self { width: self.width.max(min_width), ..self }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Horizontal cubic curve from a parent to a child.
///
/// The control points sit halfway along the depth axis so the curve leaves the
/// parent and enters the child horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkCurve {
    pub source: Point,
    pub target: Point,
}

impl LinkCurve {
    pub const fn new(source: Point, target: Point) -> Self {
        Self { source, target }
    }

    /// A zero-length curve, used as the start/end state of entering and exiting links.
    pub const fn collapsed_at(point: Point) -> Self {
        Self { source: point, target: point }
    }

    pub fn control_points(&self) -> (Point, Point) {
        let mid_x = (self.source.x + self.target.x) / 2.0;
        (Point::new(mid_x, self.source.y), Point::new(mid_x, self.target.y))
    }

    pub fn to_svg_path(&self) -> String {
        let (c1, c2) = self.control_points();
        let mut out = String::with_capacity(64);
        let _ = write!(
            out,
            "M{},{}C{},{} {},{} {},{}",
            self.source.x, self.source.y, c1.x, c1.y, c2.x, c2.y, self.target.x, self.target.y
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, LinkCurve, Margins, Point};

    #[test]
    fn bounding_box_covers_points_plus_margins() {
        let margins = Margins { top: 10.0, right: 50.0, bottom: 10.0, left: 50.0 };
        let bbox = BoundingBox::covering(
            [Point::new(0.0, 0.0), Point::new(238.5, -15.0), Point::new(238.5, 15.0)],
            margins,
        )
        .expect("bbox");

        assert_eq!(bbox, BoundingBox { x: -50.0, y: -25.0, width: 338.5, height: 50.0 });
        assert!(bbox.contains(Point::new(238.5, 15.0)));
        assert!(!bbox.contains(Point::new(400.0, 0.0)));
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert_eq!(BoundingBox::covering(std::iter::empty(), Margins::default()), None);
    }

    #[test]
    fn min_width_only_grows() {
        let bbox = BoundingBox { x: 0.0, y: 0.0, width: 200.0, height: 10.0 };
        assert_eq!(bbox.with_min_width(1000.0).width, 1000.0);
        assert_eq!(bbox.with_min_width(100.0).width, 200.0);
    }

    #[test]
    fn link_curve_is_a_horizontal_cubic() {
        let curve = LinkCurve::new(Point::new(0.0, 0.0), Point::new(200.0, 30.0));
        assert_eq!(curve.to_svg_path(), "M0,0C100,0 100,30 200,30");
    }

    #[test]
    fn collapsed_curve_starts_and_ends_on_the_point() {
        let curve = LinkCurve::collapsed_at(Point::new(5.0, 7.0));
        assert_eq!(curve.to_svg_path(), "M5,7C5,7 5,7 5,7");
    }
}
