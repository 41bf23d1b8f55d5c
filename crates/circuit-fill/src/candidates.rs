//! Candidate segment generation.
//!
//! Produces the raw pool of traces the placement engine picks from. Nothing
//! here checks collisions or containment; every random draw comes from the
//! caller's [`Rng`], so the pool is fully determined by the seed.
//!
//! All values are in generation space (mask coordinates divided by the
//! pattern scale).

use crate::config::Style;
use crate::geometry::{Bounds, Point};
use crate::rng::Rng;
use crate::segment::Segment;

/// Grid-style headings in degrees.
pub const GRID_HEADINGS: [f64; 4] = [0.0, 45.0, 90.0, 135.0];

/// One heading step.
pub const HEADING_STEP: f64 = 45.0;

/// Organic candidates per `density²` of bounding-box area.
const ORGANIC_OVERSAMPLE: f64 = 2.0;
const MIN_ORGANIC_CANDIDATES: usize = 10;

/// Upper bound on the primary pool of either style.
pub const MAX_CANDIDATES: usize = 20_000;

/// Most intermediate turns on an organic candidate.
const MAX_TURNS: usize = 2;

/// Sub-segment lengths vary by up to ±20% around the even split.
const SUB_LENGTH_JITTER: f64 = 0.2;

/// Parameters for one candidate pool.
#[derive(Debug, Clone, Copy)]
pub struct CandidateParams {
    pub bounds: Bounds,
    pub density: f64,
    pub length_min: f64,
    pub length_max: f64,
    pub style: Style,
    pub branch_ratio: f64,
}

/// Generate the candidate pool for `params`.
pub fn generate_candidates(params: &CandidateParams, rng: &mut Rng) -> Vec<Segment> {
    if params.density <= 0.0 || params.bounds.area() <= 0.0 {
        return Vec::new();
    }

    match params.style {
        Style::Grid => grid_candidates(params, rng),
        Style::Organic => organic_candidates(params, rng),
    }
}

fn random_length(params: &CandidateParams, rng: &mut Rng) -> f64 {
    if params.length_max > params.length_min {
        rng.next_range(params.length_min, params.length_max)
    } else {
        params.length_min
    }
}

/// Grid step and `(cols, rows)` for a box.
///
/// The step starts at `density` and is widened until the grid has at most
/// [`MAX_CANDIDATES`] points.
pub fn grid_layout(bounds: &Bounds, density: f64) -> (f64, usize, usize) {
    let dims = |step: f64| {
        (
            (bounds.width() / step).floor() + 1.0,
            (bounds.height() / step).floor() + 1.0,
        )
    };

    let cap = MAX_CANDIDATES as f64;
    let mut step = density;
    let (cols, rows) = dims(step);
    if cols * rows > cap {
        step *= (cols * rows / cap).sqrt();
        while dims(step).0 * dims(step).1 > cap {
            step *= 1.01;
        }
        tracing::debug!(density, step, "grid too fine, widened step");
    }

    let (cols, rows) = dims(step);
    (step, cols as usize, rows as usize)
}

/// One straight segment per grid point.
fn grid_candidates(params: &CandidateParams, rng: &mut Rng) -> Vec<Segment> {
    let b = params.bounds;
    let (step, cols, rows) = grid_layout(&b, params.density);

    let mut candidates = Vec::with_capacity(cols * rows);

    for row in 0..rows {
        let y = b.min_y + row as f64 * step;
        for col in 0..cols {
            let x = b.min_x + col as f64 * step;
            let length = random_length(params, rng);
            let heading = GRID_HEADINGS[rng.next_index(GRID_HEADINGS.len())];
            candidates.push(Segment::straight(Point::new(x, y), heading, length));
        }
    }

    candidates
}

/// Number of primary organic candidates for a box.
pub fn organic_count(bounds: &Bounds, density: f64) -> usize {
    let raw = (bounds.area() / (density * density) * ORGANIC_OVERSAMPLE).round() as usize;
    raw.clamp(MIN_ORGANIC_CANDIDATES, MAX_CANDIDATES)
}

/// Randomly placed polylines, plus optional branches off earlier ends.
fn organic_candidates(params: &CandidateParams, rng: &mut Rng) -> Vec<Segment> {
    let b = params.bounds;
    let count = organic_count(&b, params.density);
    let branches = (count as f64 * params.branch_ratio).round() as usize;

    let mut candidates = Vec::with_capacity(count + branches);

    for _ in 0..count {
        let start = Point::new(
            rng.next_range(b.min_x, b.max_x),
            rng.next_range(b.min_y, b.max_y),
        );
        let heading = rng.next_index(8) as f64 * HEADING_STEP;
        let length = random_length(params, rng);
        candidates.push(organic_polyline(start, heading, length, rng));
    }

    for _ in 0..branches {
        let parent = &candidates[rng.next_index(count)];
        let start = parent.end();
        let base = snap_heading(parent.terminal_heading());
        let offset = HEADING_STEP * (1 + rng.next_index(2)) as f64 * rng.next_sign() as f64;
        let length = random_length(params, rng);
        candidates.push(organic_polyline(start, base + offset, length, rng));
    }

    candidates
}

/// Round a heading to the nearest multiple of 45°.
fn snap_heading(degrees: f64) -> f64 {
    (degrees / HEADING_STEP).round() * HEADING_STEP
}

/// A polyline of total `length` starting at `start` with 0-2 turns of ±45°.
pub fn organic_polyline(start: Point, heading: f64, length: f64, rng: &mut Rng) -> Segment {
    let turns = rng.next_index(MAX_TURNS + 1);
    let pieces = turns + 1;

    // Even split, jittered, then normalized back to the overall length.
    let even = length / pieces as f64;
    let mut lengths: Vec<f64> = (0..pieces).map(|_| rng.jitter(even, SUB_LENGTH_JITTER)).collect();
    let total: f64 = lengths.iter().sum();
    if total > 0.0 {
        for l in &mut lengths {
            *l *= length / total;
        }
    }

    let mut points = Vec::with_capacity(pieces + 1);
    points.push(start);

    let mut current = start;
    let mut direction = heading;
    for (i, piece) in lengths.iter().enumerate() {
        if i > 0 {
            direction += HEADING_STEP * rng.next_sign() as f64;
        }
        current = current + Point::from_heading(direction) * *piece;
        points.push(current);
    }

    // Always at least two points: pieces >= 1.
    Segment::new(points, heading).unwrap_or_else(|| Segment::straight(start, heading, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(style: Style) -> CandidateParams {
        CandidateParams {
            bounds: Bounds::new(0.0, 0.0, 200.0, 100.0),
            density: 20.0,
            length_min: 20.0,
            length_max: 60.0,
            style,
            branch_ratio: 0.0,
        }
    }

    fn is_multiple_of_45(degrees: f64) -> bool {
        let steps = degrees / 45.0;
        (steps - steps.round()).abs() < 1e-9
    }

    #[test]
    fn grid_emits_one_segment_per_grid_point() {
        let mut rng = Rng::new(1);
        let c = generate_candidates(&params(Style::Grid), &mut rng);
        // 11 columns (0..=200 step 20) x 6 rows (0..=100 step 20)
        assert_eq!(c.len(), 66);
        assert_eq!(c[0].start(), Point::new(0.0, 0.0));
        assert_eq!(c[1].start(), Point::new(20.0, 0.0));
        for s in &c {
            assert!(s.is_straight());
            assert!(GRID_HEADINGS.contains(&s.angle));
            assert!(s.length() >= 20.0 - 1e-9 && s.length() < 60.0 + 1e-9);
        }
    }

    #[test]
    fn fine_grid_is_widened_to_the_cap() {
        let b = Bounds::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(grid_layout(&b, 20.0), (20.0, 41, 31));

        for density in [0.5, 0.01, 1e-9] {
            let (step, cols, rows) = grid_layout(&b, density);
            assert!(step > density);
            assert!(cols * rows <= MAX_CANDIDATES, "{cols}x{rows} at density {density}");
            assert!(cols * rows > MAX_CANDIDATES / 2);
        }

        let p = CandidateParams { bounds: b, density: 0.01, ..params(Style::Grid) };
        let c = generate_candidates(&p, &mut Rng::new(3));
        assert!(c.len() <= MAX_CANDIDATES);
        assert_eq!(c[0].start(), Point::new(0.0, 0.0));
    }

    #[test]
    fn organic_count_scales_with_area() {
        let b = Bounds::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(organic_count(&b, 20.0), 100);
        let tiny = Bounds::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(organic_count(&tiny, 20.0), MIN_ORGANIC_CANDIDATES);
    }

    #[test]
    fn organic_candidates_use_45_degree_headings() {
        let mut rng = Rng::new(7);
        let c = generate_candidates(&params(Style::Organic), &mut rng);
        assert_eq!(c.len(), 100);

        for s in &c {
            assert!(s.points().len() >= 2 && s.points().len() <= 4);
            assert!(is_multiple_of_45(s.angle));
            for (a, b) in s.sub_segments() {
                let d = b - a;
                assert!(is_multiple_of_45(d.y.atan2(d.x).to_degrees()));
            }
            let bounds = params(Style::Organic).bounds;
            assert!(bounds.contains(s.start()));
            assert!(s.length() >= 20.0 - 1e-6 && s.length() < 60.0 + 1e-6);
        }
    }

    #[test]
    fn turns_are_at_most_45_degrees_each() {
        let mut rng = Rng::new(11);
        for _ in 0..200 {
            let s = organic_polyline(Point::new(0.0, 0.0), 90.0, 50.0, &mut rng);
            let headings: Vec<f64> = s
                .sub_segments()
                .map(|(a, b)| (b - a).y.atan2((b - a).x).to_degrees())
                .collect();
            for w in headings.windows(2) {
                let mut diff = (w[1] - w[0]).abs();
                if diff > 180.0 {
                    diff = 360.0 - diff;
                }
                assert!((diff - 45.0).abs() < 1e-6, "turn of {diff} degrees");
            }
        }
    }

    #[test]
    fn sub_lengths_stay_near_even_split() {
        let mut rng = Rng::new(5);
        for _ in 0..200 {
            let s = organic_polyline(Point::new(0.0, 0.0), 0.0, 90.0, &mut rng);
            let pieces = s.points().len() - 1;
            let even = 90.0 / pieces as f64;
            for (a, b) in s.sub_segments() {
                let l = a.distance(b);
                // jitter ±20% then renormalized: stays within a 1.5x band
                assert!(l > even * 0.8 / 1.2 - 1e-9 && l < even * 1.2 / 0.8 + 1e-9);
            }
            assert!((s.length() - 90.0).abs() < 1e-6);
        }
    }

    #[test]
    fn same_seed_same_candidates() {
        let a = generate_candidates(&params(Style::Organic), &mut Rng::new(42));
        let b = generate_candidates(&params(Style::Organic), &mut Rng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn branches_start_on_existing_ends() {
        let p = CandidateParams { branch_ratio: 0.5, ..params(Style::Organic) };
        let c = generate_candidates(&p, &mut Rng::new(9));
        assert_eq!(c.len(), 150);

        let primary_ends: Vec<Point> = c[..100].iter().map(|s| s.end()).collect();
        for branch in &c[100..] {
            assert!(primary_ends.contains(&branch.start()));
        }
    }

    #[test]
    fn empty_box_generates_nothing() {
        let p = CandidateParams { bounds: Bounds::new(5.0, 5.0, 5.0, 5.0), ..params(Style::Grid) };
        assert!(generate_candidates(&p, &mut Rng::new(0)).is_empty());
    }
}
