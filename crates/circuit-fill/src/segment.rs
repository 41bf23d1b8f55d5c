//! Trace segments - the polylines that make up a pattern.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Which end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum End {
    Start,
    End,
}

impl End {
    pub const BOTH: [End; 2] = [End::Start, End::End];
}

/// A polyline of two or more points.
///
/// `angle` is the nominal heading of the first sub-segment in degrees. It is
/// recorded at generation time and is not updated by shortening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    points: Vec<Point>,
    pub angle: f64,
}

impl Segment {
    /// Create a segment from a point list.
    ///
    /// Returns `None` when fewer than two points are given.
    pub fn new(points: Vec<Point>, angle: f64) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points, angle })
    }

    /// A straight segment from `start` along `angle` degrees.
    pub fn straight(start: Point, angle: f64, length: f64) -> Self {
        let end = start + Point::from_heading(angle) * length;
        Self { points: vec![start, end], angle }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.points[0]
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    #[inline]
    pub fn endpoint(&self, end: End) -> Point {
        match end {
            End::Start => self.start(),
            End::End => self.end(),
        }
    }

    /// Both endpoints, start first.
    #[inline]
    pub fn endpoints(&self) -> [Point; 2] {
        [self.start(), self.end()]
    }

    /// Vertices strictly between start and end.
    #[inline]
    pub fn interior(&self) -> &[Point] {
        &self.points[1..self.points.len() - 1]
    }

    /// True when the polyline has no intermediate points.
    #[inline]
    pub fn is_straight(&self) -> bool {
        self.points.len() == 2
    }

    /// Consecutive point pairs.
    pub fn sub_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.sub_segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Point at arc length `distance` from the start, clamped to the polyline.
    pub fn point_at(&self, distance: f64) -> Point {
        let mut remaining = distance.max(0.0);
        for (a, b) in self.sub_segments() {
            let len = a.distance(b);
            if remaining <= len {
                if len <= 0.0 {
                    return a;
                }
                return a.lerp(b, remaining / len);
            }
            remaining -= len;
        }
        self.end()
    }

    /// Arc-length midpoint.
    pub fn midpoint(&self) -> Point {
        self.point_at(self.length() / 2.0)
    }

    /// Unit vector of the first sub-segment pointing into the segment from
    /// `end`, or `None` when that sub-segment has zero length.
    pub fn inward_direction(&self, end: End) -> Option<Point> {
        let (tip, next) = self.terminal_pair(end);
        (next - tip).normalized()
    }

    /// Heading in degrees of travel leaving the segment at its end point.
    pub fn terminal_heading(&self) -> f64 {
        let n = self.points.len();
        let d = self.points[n - 1] - self.points[n - 2];
        d.y.atan2(d.x).to_degrees()
    }

    fn terminal_pair(&self, end: End) -> (Point, Point) {
        let n = self.points.len();
        match end {
            End::Start => (self.points[0], self.points[1]),
            End::End => (self.points[n - 1], self.points[n - 2]),
        }
    }

    /// Replace the tip at `end`.
    pub(crate) fn set_endpoint(&mut self, end: End, p: Point) {
        let idx = match end {
            End::Start => 0,
            End::End => self.points.len() - 1,
        };
        self.points[idx] = p;
    }

    /// Length of the terminal sub-segment at `end`.
    pub fn terminal_length(&self, end: End) -> f64 {
        let (tip, next) = self.terminal_pair(end);
        tip.distance(next)
    }

    /// Every point multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Segment {
        Segment {
            points: self.points.iter().map(|p| *p * factor).collect(),
            angle: self.angle,
        }
    }
}
