//! Greedy placement engine.
//!
//! Candidates are visited longest first and each one is accepted only if it
//! keeps clear of every segment accepted before it. There is no retry and no
//! backtracking: a rejected candidate is gone.
//!
//! # Rules (checked pairwise against each placed segment)
//!
//! 1. Endpoints closer than the coincidence threshold are *shared*. Shared
//!    endpoints are the only legal contact and later become forks.
//! 2. Non-shared endpoint pairs must be at least the pad clearance apart.
//! 3. Non-shared endpoints must be at least the pad clearance from the other
//!    segment's path.
//! 4. Paths may only cross within the threshold of a declared endpoint.
//! 5. Paths must keep the minimum spacing everywhere except right at a
//!    shared endpoint.
//!
//! # Performance
//!
//! O(n·m) for n candidates and m placed segments, no spatial index. The
//! acceptance order is what defines the pattern, so any index added later
//! has to keep visiting candidates in the same order.

use crate::config::Options;
use crate::geometry::Point;
use crate::proximity::{point_polyline_distance, polyline_intersections, segment_segment_distance};
use crate::segment::Segment;

/// Endpoints closer than this are the same point.
pub const COINCIDENCE_THRESHOLD: f64 = 3.0;

/// Extra room between two adjacent pads.
pub const PAD_PADDING: f64 = 3.0;

/// Distances a candidate has to keep from placed segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    /// Coincidence threshold for shared endpoints.
    pub threshold: f64,
    /// Minimum endpoint-to-endpoint and endpoint-to-path distance.
    pub pad_clearance: f64,
    /// Minimum path-to-path distance.
    pub min_spacing: f64,
}

impl Clearance {
    pub fn new(density: f64, line_thickness: f64, circle_radius: f64) -> Self {
        Self {
            threshold: COINCIDENCE_THRESHOLD,
            pad_clearance: 2.0 * circle_radius + line_thickness + PAD_PADDING,
            min_spacing: density * 0.5 + line_thickness * 0.5,
        }
    }

    /// Clearance in generation units for `options`.
    pub fn from_options(options: &Options) -> Self {
        Self::new(options.density, options.line_thickness, options.circle_radius)
    }
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    PadClearance,
    EndpointToPath,
    Crossing,
    Spacing,
}

/// Counters for one placement run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementStats {
    pub considered: usize,
    pub accepted: usize,
    pub pad_clearance: usize,
    pub endpoint_to_path: usize,
    pub crossing: usize,
    pub spacing: usize,
}

impl PlacementStats {
    fn record(&mut self, outcome: Result<(), Rejection>) {
        self.considered += 1;
        match outcome {
            Ok(()) => self.accepted += 1,
            Err(Rejection::PadClearance) => self.pad_clearance += 1,
            Err(Rejection::EndpointToPath) => self.endpoint_to_path += 1,
            Err(Rejection::Crossing) => self.crossing += 1,
            Err(Rejection::Spacing) => self.spacing += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.considered - self.accepted
    }
}

/// The accepted set for one generation call.
///
/// Created fresh per call and consumed at the end, so nothing carries over
/// between calls.
#[derive(Debug)]
pub struct PlacementState {
    clearance: Clearance,
    placed: Vec<Segment>,
    stats: PlacementStats,
}

impl PlacementState {
    pub fn new(clearance: Clearance) -> Self {
        Self { clearance, placed: Vec::new(), stats: PlacementStats::default() }
    }

    /// Accept `candidate` if it clears every placed segment.
    pub fn try_place(&mut self, candidate: Segment) -> Result<(), Rejection> {
        let outcome = self
            .placed
            .iter()
            .try_for_each(|placed| check_pair(&candidate, placed, &self.clearance));

        self.stats.record(outcome);
        if outcome.is_ok() {
            self.placed.push(candidate);
        }
        outcome
    }

    pub fn placed(&self) -> &[Segment] {
        &self.placed
    }

    pub fn stats(&self) -> &PlacementStats {
        &self.stats
    }

    pub fn into_parts(self) -> (Vec<Segment>, PlacementStats) {
        (self.placed, self.stats)
    }
}

/// Run greedy placement over `candidates`, longest first.
///
/// Ties in length keep their original order (stable sort).
pub fn place_segments(
    candidates: Vec<Segment>,
    clearance: &Clearance,
) -> (Vec<Segment>, PlacementStats) {
    let mut keyed: Vec<(f64, Segment)> = candidates.into_iter().map(|s| (s.length(), s)).collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut state = PlacementState::new(*clearance);
    for (_, candidate) in keyed {
        // Rejections are counted in the stats; nothing else to do with them.
        let _ = state.try_place(candidate);
    }

    let (placed, stats) = state.into_parts();
    tracing::debug!(considered = stats.considered, accepted = stats.accepted, "placement finished");
    tracing::trace!(
        pad_clearance = stats.pad_clearance,
        endpoint_to_path = stats.endpoint_to_path,
        crossing = stats.crossing,
        spacing = stats.spacing,
        "rejections by rule"
    );
    (placed, stats)
}

/// Check `candidate` against a single placed segment.
pub fn check_pair(
    candidate: &Segment,
    placed: &Segment,
    clearance: &Clearance,
) -> Result<(), Rejection> {
    let cand_ends = candidate.endpoints();
    let placed_ends = placed.endpoints();

    // Rules 1 & 2: classify every endpoint pair.
    let mut cand_shared = [false; 2];
    let mut placed_shared = [false; 2];
    let mut shared_points: Vec<Point> = Vec::new();

    for (i, ce) in cand_ends.iter().enumerate() {
        for (j, pe) in placed_ends.iter().enumerate() {
            let d = ce.distance(*pe);
            if d < clearance.threshold {
                cand_shared[i] = true;
                placed_shared[j] = true;
                shared_points.push(*ce);
                shared_points.push(*pe);
            } else if d < clearance.pad_clearance {
                return Err(Rejection::PadClearance);
            }
        }
    }

    // Both ends on the same trace: a duplicate or a closed loop.
    if cand_shared[0] && cand_shared[1] {
        return Err(Rejection::Spacing);
    }

    // Rule 3: loose ends keep clear of the other path.
    for (j, pe) in placed_ends.iter().enumerate() {
        if !placed_shared[j]
            && point_polyline_distance(*pe, candidate.points()) < clearance.pad_clearance
        {
            return Err(Rejection::EndpointToPath);
        }
    }
    for (i, ce) in cand_ends.iter().enumerate() {
        if !cand_shared[i]
            && point_polyline_distance(*ce, placed.points()) < clearance.pad_clearance
        {
            return Err(Rejection::EndpointToPath);
        }
    }

    // Rule 4: crossings only at declared endpoints.
    for hit in polyline_intersections(candidate.points(), placed.points()) {
        let at_endpoint = cand_ends
            .iter()
            .chain(placed_ends.iter())
            .any(|e| e.distance(hit) < clearance.threshold);
        if !at_endpoint {
            return Err(Rejection::Crossing);
        }
    }

    // Rule 5: path spacing.
    if path_spacing(candidate.points(), placed.points(), &shared_points, clearance.threshold)
        < clearance.min_spacing
    {
        return Err(Rejection::Spacing);
    }

    Ok(())
}

/// Minimum distance between two polylines, ignoring the immediate
/// neighbourhood of shared points.
///
/// Vertices sitting on a shared point are not measured, and neither are
/// sub-segment pairs that both run into the same shared point. The far
/// vertices of those sub-segments still are, so two traces leaving a fork
/// side by side are caught.
pub fn path_spacing(a: &[Point], b: &[Point], shared: &[Point], threshold: f64) -> f64 {
    let near_shared = |p: Point| shared.iter().any(|s| p.distance(*s) < threshold);
    let touches =
        |p: Point, q: Point, s: Point| p.distance(s) < threshold || q.distance(s) < threshold;

    let mut best = f64::INFINITY;

    for &v in a.iter().filter(|v| !near_shared(**v)) {
        best = best.min(point_polyline_distance(v, b));
    }
    for &v in b.iter().filter(|v| !near_shared(**v)) {
        best = best.min(point_polyline_distance(v, a));
    }

    for sa in a.windows(2) {
        for sb in b.windows(2) {
            let joined = shared
                .iter()
                .any(|&s| touches(sa[0], sa[1], s) && touches(sb[0], sb[1], s));
            if joined {
                continue;
            }
            best = best.min(segment_segment_distance(sa[0], sa[1], sb[0], sb[1]));
        }
    }

    best
}
