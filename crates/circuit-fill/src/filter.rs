//! Containment filter - drop candidates that leave the region.
//!
//! Only a handful of points per candidate are tested, not the whole
//! polyline. Placement clearance rules constrain the rest.

use crate::geometry::Point;
use crate::mask::ContainmentPredicate;
use crate::segment::Segment;

/// Points of `segment` that are tested against the mask: both ends, every
/// turn vertex, and the arc-length midpoint.
pub fn sample_points(segment: &Segment) -> Vec<Point> {
    let mut samples = Vec::with_capacity(segment.points().len() + 1);
    samples.push(segment.start());
    samples.push(segment.end());
    samples.extend_from_slice(segment.interior());
    samples.push(segment.midpoint());
    samples
}

/// Whether every sample of `segment`, scaled into mask coordinates, is inside.
pub fn is_contained<M>(segment: &Segment, mask: &M, scale: f64) -> bool
where
    M: ContainmentPredicate + ?Sized,
{
    sample_points(segment).into_iter().all(|p| mask.contains(p * scale))
}

/// Keep the candidates whose samples all fall inside `mask`.
///
/// `scale` maps generation space to mask space (the pattern scale).
pub fn filter_contained<M>(candidates: Vec<Segment>, mask: &M, scale: f64) -> Vec<Segment>
where
    M: ContainmentPredicate + ?Sized,
{
    candidates
        .into_iter()
        .filter(|segment| is_contained(segment, mask, scale))
        .collect()
}
