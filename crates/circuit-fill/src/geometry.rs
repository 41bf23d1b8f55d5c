//! Core geometry types for circuit-fill.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = print with `{:?}`
//! - `Clone` / `Copy` = duplicate the value (Copy is implicit, small values only)
//! - `PartialEq` = compare with `==`
//! - `Serialize` / `Deserialize` = serde can read/write it (YAML options, JSON output)

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::mask::point_in_polygon;

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Length of this point treated as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    ///
    /// ## Rust Lesson #6: Option<T>
    ///
    /// There is no `null`. A degenerate direction is `None`, and the caller
    /// has to decide what to do with it (usually: skip).
    #[inline]
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len < 1e-12 {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    /// Linear interpolation towards `other` (t = 0 is self, t = 1 is other).
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Unit vector for a heading in degrees.
    #[inline]
    pub fn from_heading(degrees: f64) -> Point {
        let rad = degrees.to_radians();
        Point::new(rad.cos(), rad.sin())
    }
}

// ## Rust Lesson #5: Operator traits
//
// Implementing `Add`, `Sub` and `Mul` lets geometry code read like math:
// `start + dir * length` instead of building points field by field.

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Bounding box of a point set, `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some(Self { min_x, min_y, max_x, max_y })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled(&self, factor: f64) -> Bounds {
        Bounds::new(
            self.min_x * factor,
            self.min_y * factor,
            self.max_x * factor,
            self.max_y * factor,
        )
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// A polygon with an outer boundary and optional holes.
///
/// ## Rust Lesson #4: Ownership & Vec
///
/// This struct OWNS its points - when it's dropped, they're freed.
/// `&[Point]` would be a BORROWED slice (read-only view).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Outer boundary vertices
    pub outer: Vec<Point>,
    /// Interior holes
    pub holes: Vec<Vec<Point>>,
    /// Optional ID from the SVG element
    pub id: Option<String>,
}

impl Polygon {
    /// Create a simple polygon with no holes.
    pub fn new(outer: Vec<Point>) -> Self {
        Self { outer, holes: Vec::new(), id: None }
    }

    /// Create a polygon with holes.
    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { outer, holes, id: None }
    }

    pub fn bounding_box(&self) -> Option<Bounds> {
        Bounds::from_points(&self.outer)
    }

    /// Check if a point is inside the polygon body (inside outer, not in any hole).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        if !point_in_polygon(p.x, p.y, &self.outer) {
            return false;
        }
        !self.holes.iter().any(|hole| point_in_polygon(p.x, p.y, hole))
    }

    /// Signed area of the outer boundary (shoelace formula).
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.outer)
    }

    /// Filled area: outer boundary minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area_of_points(h).abs()).sum();
        (self.signed_area().abs() - holes).max(0.0)
    }

    /// Multiply every vertex by `factor`.
    pub fn scaled(&self, factor: f64) -> Polygon {
        let scale = |pts: &Vec<Point>| pts.iter().map(|p| *p * factor).collect::<Vec<_>>();
        Polygon {
            outer: scale(&self.outer),
            holes: self.holes.iter().map(scale).collect(),
            id: self.id.clone(),
        }
    }
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Positive for counter-clockwise winding, negative for clockwise.
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn point_ops() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0) * 2.0 - Point::new(1.0, 1.0);
        assert_eq!(p, Point::new(6.0, 9.0));
    }

    #[test]
    fn normalized_zero_is_none() {
        assert!(Point::new(0.0, 0.0).normalized().is_none());
        let n = Point::new(0.0, 5.0).normalized().unwrap();
        assert_eq!(n, Point::new(0.0, 1.0));
    }

    #[test]
    fn heading_vectors() {
        let east = Point::from_heading(0.0);
        assert!((east.x - 1.0).abs() < 1e-12 && east.y.abs() < 1e-12);
        let diag = Point::from_heading(45.0);
        assert!((diag.x - diag.y).abs() < 1e-12);
    }

    #[test]
    fn polygon_bbox() {
        let poly = square(10.0);
        assert_eq!(poly.bounding_box(), Some(Bounds::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn empty_polygon_bbox() {
        let poly = Polygon::new(vec![]);
        assert_eq!(poly.bounding_box(), None);
    }

    #[test]
    fn polygon_contains_respects_holes() {
        let poly = Polygon::with_holes(
            square(10.0).outer,
            vec![vec![
                Point::new(4.0, 4.0),
                Point::new(6.0, 4.0),
                Point::new(6.0, 6.0),
                Point::new(4.0, 6.0),
            ]],
        );
        assert!(poly.contains(Point::new(2.0, 2.0)));
        assert!(!poly.contains(Point::new(5.0, 5.0)));
        assert!(!poly.contains(Point::new(15.0, 5.0)));
        assert!((poly.area() - 96.0).abs() < 1e-10);
    }

    #[test]
    fn bounds_union_and_scale() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, -5.0, 20.0, 8.0);
        assert_eq!(a.union(&b), Bounds::new(0.0, -5.0, 20.0, 10.0));
        assert_eq!(a.scaled(0.5), Bounds::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(a.area(), 100.0);
    }

    #[test]
    fn signed_area_winding() {
        let ccw = square(10.0);
        assert!((ccw.signed_area() - 100.0).abs() < 1e-10);

        let mut cw = ccw.clone();
        cw.outer.reverse();
        assert!((cw.signed_area() + 100.0).abs() < 1e-10);
    }
}
