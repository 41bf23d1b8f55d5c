//! The generation pipeline and its result.
//!
//! ```text
//! mask bounds ─► candidates ─► containment filter ─► greedy placement
//!                                                        │
//!        Pattern ◄─ rescale ◄─ shorten ◄─ circles ◄─ fork detection
//! ```
//!
//! Work happens in generation space (mask coordinates divided by the pattern
//! scale) with the unscaled options; only the finished geometry is
//! multiplied back up. Each call owns its placement state, so calls are
//! independent and a given seed always reproduces the same pattern.

use serde::Serialize;

use crate::candidates::{CandidateParams, generate_candidates};
use crate::config::{GradientType, Options};
use crate::error::{GenerateError, Result};
use crate::filter::filter_contained;
use crate::forks::{Fork, detect_forks};
use crate::geometry::Point;
use crate::mask::{ContainmentPredicate, NamedShape, ShapeSet};
use crate::placement::{Clearance, place_segments};
use crate::rng::Rng;
use crate::segment::Segment;
use crate::shorten::{extract_circles, shorten_segments};

/// A generated circuit pattern in output coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub segments: Vec<Segment>,
    /// Pad centers at free endpoints.
    pub circles: Vec<Point>,
    pub forks: Vec<Fork>,
    pub line_thickness: f64,
    pub circle_radius: f64,
    pub line_color: String,
    pub gradient_type: GradientType,
    pub gradient_color: String,
    /// Gradient geometry, output space. Free for the caller to overwrite.
    pub gradient_start: Option<Point>,
    pub gradient_end: Option<Point>,
    pub seed: u64,
}

impl Pattern {
    /// Multiply all geometry by `factor`.
    ///
    /// Stroke width and pad radius scale along; gradient geometry does not.
    pub fn scaled(mut self, factor: f64) -> Pattern {
        for s in &mut self.segments {
            *s = s.scaled(factor);
        }
        for c in &mut self.circles {
            *c = *c * factor;
        }
        for f in &mut self.forks {
            f.point = f.point * factor;
        }
        self.line_thickness *= factor;
        self.circle_radius *= factor;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Generate a pattern inside `mask`, seeded from `options.seed` (or
/// [`DEFAULT_SEED`](crate::config::DEFAULT_SEED)).
pub fn generate<M>(mask: &M, options: &Options) -> Result<Pattern>
where
    M: ContainmentPredicate + ?Sized,
{
    let mut rng = Rng::new(options.seed_or_default());
    generate_with_rng(mask, options, &mut rng)
}

/// Generate a pattern inside the union of `shapes`.
pub fn generate_from_shapes(shapes: Vec<NamedShape>, options: &Options) -> Result<Pattern> {
    let set = ShapeSet::new(shapes)?;
    generate(&set, options)
}

/// Generate a pattern, drawing every random value from `rng`.
pub fn generate_with_rng<M>(mask: &M, options: &Options, rng: &mut Rng) -> Result<Pattern>
where
    M: ContainmentPredicate + ?Sized,
{
    options.validate()?;

    let bounds = mask
        .bounds()
        .filter(|b| b.area() > 0.0)
        .ok_or(GenerateError::NoValidRegion)?;

    let scale = options.pattern_scale;
    let _span = tracing::debug_span!(
        "generate",
        seed = rng.seed(),
        style = options.style.name()
    )
    .entered();

    let (length_min, length_max) = options.length_range();
    let params = CandidateParams {
        bounds: bounds.scaled(1.0 / scale),
        density: options.density,
        length_min,
        length_max,
        style: options.style,
        branch_ratio: options.branch_ratio,
    };

    let candidates = generate_candidates(&params, rng);
    tracing::debug!(count = candidates.len(), "candidates generated");

    let contained = filter_contained(candidates, mask, scale);
    tracing::debug!(count = contained.len(), "candidates inside region");

    let clearance = Clearance::from_options(options);
    let (mut segments, _stats) = place_segments(contained, &clearance);

    let fork_map = detect_forks(&segments, clearance.threshold);
    let circles = extract_circles(&segments, &fork_map);
    shorten_segments(&mut segments, &fork_map, options.circle_radius);

    tracing::debug!(
        segments = segments.len(),
        circles = circles.len(),
        forks = fork_map.forks.len(),
        "pattern assembled"
    );

    let pattern = Pattern {
        segments,
        circles,
        forks: fork_map.into_forks(),
        line_thickness: options.line_thickness,
        circle_radius: options.circle_radius,
        line_color: options.line_color.clone(),
        gradient_type: options.gradient_type,
        gradient_color: options.gradient_color.clone(),
        gradient_start: options.gradient_start,
        gradient_end: options.gradient_end,
        seed: rng.seed(),
    };

    Ok(pattern.scaled(scale))
}
