//! Distance and intersection primitives for polylines.
//!
//! This is the HOT PATH - placement calls these for every candidate against
//! every placed segment.

use crate::geometry::Point;

/// Parallel-line cutoff for the intersection denominator.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Distance from `p` to the segment `a`-`b` (projection clamped to the segment).
#[inline]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq < 1e-18 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Intersection point of segments `a1`-`a2` and `b1`-`b2`.
///
/// Uses the parametric form; both parameters must lie in [0, 1]. Parallel
/// or coincident segments report no intersection.
#[inline]
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1.lerp(a2, ua))
    } else {
        None
    }
}

/// Minimum distance between two segments (zero when they cross).
#[inline]
pub fn segment_segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    if segment_intersection(a1, a2, b1, b2).is_some() {
        return 0.0;
    }
    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// Distance from `p` to the nearest point of a polyline.
pub fn point_polyline_distance(p: Point, polyline: &[Point]) -> f64 {
    match polyline {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => polyline
            .windows(2)
            .map(|w| point_segment_distance(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Every crossing between two polylines, sub-segment by sub-segment.
pub fn polyline_intersections(a: &[Point], b: &[Point]) -> Vec<Point> {
    let mut hits = Vec::new();
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            if let Some(p) = segment_intersection(sa[0], sa[1], sb[0], sb[1]) {
                hits.push(p);
            }
        }
    }
    hits
}

/// Minimum distance between two polylines.
pub fn polyline_distance(a: &[Point], b: &[Point]) -> f64 {
    let mut best = f64::INFINITY;
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            best = best.min(segment_segment_distance(sa[0], sa[1], sb[0], sb[1]));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn point_to_segment_projection() {
        assert_eq!(point_segment_distance(p(5.0, 3.0), p(0.0, 0.0), p(10.0, 0.0)), 3.0);
        // beyond the end clamps to the endpoint
        assert_eq!(point_segment_distance(p(13.0, 4.0), p(0.0, 0.0), p(10.0, 0.0)), 5.0);
        // degenerate segment
        assert_eq!(point_segment_distance(p(3.0, 4.0), p(0.0, 0.0), p(0.0, 0.0)), 5.0);
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = segment_intersection(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0));
        let hit = hit.expect("diagonals cross");
        assert!((hit.x - 5.0).abs() < 1e-9 && (hit.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let (a1, a2, b1, b2) = (p(0.0, 0.0), p(10.0, 0.0), p(0.0, 5.0), p(10.0, 5.0));
        assert!(segment_intersection(a1, a2, b1, b2).is_none());
        assert_eq!(segment_segment_distance(a1, a2, b1, b2), 5.0);
    }

    #[test]
    fn touching_endpoints_intersect_at_the_endpoint() {
        let hit = segment_intersection(p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(10.0, 10.0));
        assert_eq!(hit, Some(p(10.0, 0.0)));
    }

    #[test]
    fn disjoint_segments_outside_parameter_range() {
        assert!(segment_intersection(p(0.0, 0.0), p(1.0, 1.0), p(5.0, 0.0), p(4.0, 1.0)).is_none());
    }

    #[test]
    fn polyline_helpers() {
        let a = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        let b = [p(20.0, 0.0), p(20.0, 10.0)];
        assert_eq!(polyline_distance(&a, &b), 10.0);
        assert_eq!(point_polyline_distance(p(15.0, 5.0), &a), 5.0);
        assert!(polyline_intersections(&a, &b).is_empty());

        let c = [p(5.0, -5.0), p(5.0, 5.0)];
        assert_eq!(polyline_intersections(&a, &c), vec![p(5.0, 0.0)]);
        assert_eq!(polyline_distance(&a, &c), 0.0);
    }

    proptest! {
        #[test]
        fn segment_distance_is_symmetric(
            ax in -100.0..100.0f64, ay in -100.0..100.0f64,
            bx in -100.0..100.0f64, by in -100.0..100.0f64,
            cx in -100.0..100.0f64, cy in -100.0..100.0f64,
            dx in -100.0..100.0f64, dy in -100.0..100.0f64,
        ) {
            let d1 = segment_segment_distance(p(ax, ay), p(bx, by), p(cx, cy), p(dx, dy));
            let d2 = segment_segment_distance(p(cx, cy), p(dx, dy), p(ax, ay), p(bx, by));
            prop_assert!((d1 - d2).abs() < 1e-9);
            prop_assert!(d1 >= 0.0);
        }

        #[test]
        fn segment_distance_never_exceeds_endpoint_distance(
            ax in -100.0..100.0f64, ay in -100.0..100.0f64,
            bx in -100.0..100.0f64, by in -100.0..100.0f64,
            cx in -100.0..100.0f64, cy in -100.0..100.0f64,
            dx in -100.0..100.0f64, dy in -100.0..100.0f64,
        ) {
            let d = segment_segment_distance(p(ax, ay), p(bx, by), p(cx, cy), p(dx, dy));
            prop_assert!(d <= p(ax, ay).distance(p(cx, cy)) + 1e-9);
            prop_assert!(d <= p(bx, by).distance(p(dx, dy)) + 1e-9);
        }
    }
}
