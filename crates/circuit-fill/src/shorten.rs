//! Pad circles and endpoint shortening.
//!
//! Every endpoint that is not part of a fork gets a circle pad. The trace is
//! then pulled back from the pad so the stroke ends at the circle's rim
//! instead of running through it.

use crate::forks::ForkMap;
use crate::geometry::Point;
use crate::segment::{End, Segment};

/// Gap between the pad rim and the shortened stroke end.
pub const SHORTEN_PADDING: f64 = 1.0;

/// Circle centers for every non-fork endpoint, in segment order.
///
/// Must run before [`shorten_segments`]: circles sit on the original tips.
pub fn extract_circles(segments: &[Segment], forks: &ForkMap) -> Vec<Point> {
    segments
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            End::BOTH
                .into_iter()
                .filter(move |&end| !forks.is_fork_end(i, end))
                .map(move |end| s.endpoint(end))
        })
        .collect()
}

/// Pull `end` of `segment` inward by up to `amount`.
///
/// The move is clamped to the terminal sub-segment so it never overshoots
/// the next vertex. Returns how far the tip actually moved.
pub fn shorten_end(segment: &mut Segment, end: End, amount: f64) -> f64 {
    let Some(direction) = segment.inward_direction(end) else {
        return 0.0;
    };
    let step = amount.min(segment.terminal_length(end)).max(0.0);
    let tip = segment.endpoint(end);
    segment.set_endpoint(end, tip + direction * step);
    step
}

/// Shorten every non-fork endpoint by `circle_radius + SHORTEN_PADDING`.
pub fn shorten_segments(segments: &mut [Segment], forks: &ForkMap, circle_radius: f64) {
    let trim = circle_radius + SHORTEN_PADDING;
    let mut moved = 0usize;

    for (i, segment) in segments.iter_mut().enumerate() {
        for end in End::BOTH {
            if forks.is_fork_end(i, end) {
                continue;
            }
            if shorten_end(segment, end, trim) > 0.0 {
                moved += 1;
            }
        }
    }

    tracing::trace!(moved, trim, "endpoints shortened");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{CandidateParams, generate_candidates};
    use crate::config::Style;
    use crate::forks::detect_forks;
    use crate::geometry::Bounds;
    use crate::placement::{Clearance, place_segments};
    use crate::proximity::point_segment_distance;
    use crate::rng::Rng;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(vec![Point::new(x1, y1), Point::new(x2, y2)], 0.0).unwrap()
    }

    #[test]
    fn circles_skip_fork_ends() {
        let segs = vec![line(0.0, 0.0, 100.0, 0.0), line(100.0, 0.0, 100.0, 80.0)];
        let forks = detect_forks(&segs, 3.0);
        let circles = extract_circles(&segs, &forks);
        assert_eq!(circles, vec![Point::new(0.0, 0.0), Point::new(100.0, 80.0)]);
    }

    #[test]
    fn free_ends_pull_back_fork_ends_stay() {
        let mut segs = vec![line(0.0, 0.0, 100.0, 0.0), line(100.0, 0.0, 100.0, 80.0)];
        let forks = detect_forks(&segs, 3.0);
        shorten_segments(&mut segs, &forks, 4.0);

        assert_eq!(segs[0].start(), Point::new(5.0, 0.0));
        assert_eq!(segs[0].end(), Point::new(100.0, 0.0));
        assert_eq!(segs[1].start(), Point::new(100.0, 0.0));
        assert_eq!(segs[1].end(), Point::new(100.0, 75.0));
    }

    #[test]
    fn shortening_clamps_to_terminal_sub_segment() {
        let mut s = Segment::new(
            vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(2.0, 50.0)],
            0.0,
        )
        .unwrap();
        let moved = shorten_end(&mut s, End::Start, 5.0);
        assert_eq!(moved, 2.0);
        assert_eq!(s.start(), Point::new(2.0, 0.0));
        // a zero-length terminal piece has no direction and is left alone
        assert_eq!(shorten_end(&mut s, End::Start, 5.0), 0.0);
    }

    #[test]
    fn short_segments_never_go_negative() {
        let mut segs = vec![line(0.0, 0.0, 6.0, 0.0)];
        let forks = detect_forks(&segs, 3.0);
        shorten_segments(&mut segs, &forks, 4.0);
        // start takes 5 of the 6, end is clamped to the 1 left
        assert_eq!(segs[0].start(), Point::new(5.0, 0.0));
        assert_eq!(segs[0].end(), Point::new(5.0, 0.0));
        assert_eq!(segs[0].length(), 0.0);
    }

    #[test]
    fn circles_use_original_tips() {
        let mut segs = vec![line(0.0, 0.0, 50.0, 0.0)];
        let forks = detect_forks(&segs, 3.0);
        let circles = extract_circles(&segs, &forks);
        shorten_segments(&mut segs, &forks, 4.0);
        assert_eq!(circles, vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
        assert_eq!(segs[0].start(), Point::new(5.0, 0.0));
    }

    /// Tip and next vertex of `end`.
    fn terminal_piece(s: &Segment, end: End) -> (Point, Point) {
        let p = s.points();
        match end {
            End::Start => (p[0], p[1]),
            End::End => (p[p.len() - 1], p[p.len() - 2]),
        }
    }

    #[test]
    fn placed_pool_shortens_within_terminal_pieces() {
        let params = CandidateParams {
            bounds: Bounds::new(0.0, 0.0, 300.0, 300.0),
            density: 20.0,
            length_min: 20.0,
            length_max: 150.0,
            style: Style::Organic,
            branch_ratio: 0.4,
        };
        let clearance = Clearance::new(20.0, 2.0, 4.0);
        let trim = 4.0 + SHORTEN_PADDING;

        for seed in [2, 17, 404] {
            let candidates = generate_candidates(&params, &mut Rng::new(seed));
            let (placed, _) = place_segments(candidates, &clearance);
            let forks = detect_forks(&placed, clearance.threshold);
            let mut shortened = placed.clone();
            shorten_segments(&mut shortened, &forks, 4.0);

            assert!(!placed.is_empty());
            for (i, (before, after)) in placed.iter().zip(&shortened).enumerate() {
                assert_eq!(before.points().len(), after.points().len());
                assert_eq!(before.interior(), after.interior());

                for end in End::BOTH {
                    if forks.is_fork_end(i, end) {
                        assert_eq!(before.endpoint(end), after.endpoint(end));
                        continue;
                    }
                    let (tip, next) = terminal_piece(before, end);
                    let moved = after.endpoint(end);
                    assert!(point_segment_distance(moved, tip, next) < 1e-9);
                    let expected = trim.min(tip.distance(next));
                    assert!((tip.distance(moved) - expected).abs() < 1e-9);
                }
            }
        }
    }
}
