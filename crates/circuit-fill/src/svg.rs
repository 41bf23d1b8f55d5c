//! SVG region loading - read fill regions out of an SVG document.
//!
//! usvg resolves the document (CSS, transforms, `<use>`, basic shapes), then
//! every path becomes one [`NamedShape`]: the first subpath is the outline,
//! later subpaths are holes.
//!
//! ## Curve Flattening
//!
//! Bézier segments are flattened with lyon_geom so the containment test sees
//! the real curve, not just the control-point hull.

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use usvg::tiny_skia_path::PathSegment;

use crate::error::SvgError;
use crate::geometry::{Point, Polygon};
use crate::mask::{NamedShape, Shape};

/// Flattening tolerance in user units.
const CURVE_TOLERANCE: f32 = 0.1;

/// Shapes of an SVG document plus its canvas size.
#[derive(Debug, Clone)]
pub struct SvgRegion {
    pub shapes: Vec<NamedShape>,
    pub width: f64,
    pub height: f64,
}

/// Parse `svg_content` and collect every closed shape with the canvas size.
///
/// ## Rust Lesson #21: The ? Operator
///
/// `Tree::from_str(..).map_err(..)?` converts the usvg error into ours and
/// returns early; the happy path reads straight down.
pub fn load_region(svg_content: &str) -> Result<SvgRegion, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut shapes = Vec::new();
    collect_group(tree.root(), &mut shapes);

    if shapes.is_empty() {
        return Err(SvgError::NoShapes);
    }

    tracing::debug!(shapes = shapes.len(), "loaded SVG region");
    Ok(SvgRegion {
        shapes,
        width: tree.size().width() as f64,
        height: tree.size().height() as f64,
    })
}

/// Collect every closed shape in `svg_content`.
pub fn extract_shapes_from_svg(svg_content: &str) -> Result<Vec<NamedShape>, SvgError> {
    load_region(svg_content).map(|region| region.shapes)
}

fn collect_group(group: &usvg::Group, shapes: &mut Vec<NamedShape>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_group(g, shapes),
            usvg::Node::Path(path) => {
                if let Some(polygon) = path_to_polygon(path) {
                    let name = polygon
                        .id
                        .clone()
                        .unwrap_or_else(|| format!("shape-{}", shapes.len() + 1));
                    shapes.push(NamedShape::new(name, Shape::Polygon(polygon)));
                }
            }
            // Text and images carry no fill region.
            _ => {}
        }
    }
}

/// Apply an affine transform to a path point.
fn map_point(ts: &usvg::Transform, x: f32, y: f32) -> Point {
    Point::new(
        (ts.sx * x + ts.kx * y + ts.tx) as f64,
        (ts.ky * x + ts.sy * y + ts.ty) as f64,
    )
}

/// Convert a usvg path into a polygon with holes, in document coordinates.
fn path_to_polygon(path: &usvg::Path) -> Option<Polygon> {
    let ts = path.abs_transform();
    let mut rings: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut last: Option<(f32, f32)> = None;

    for seg in path.data().segments() {
        match seg {
            PathSegment::MoveTo(p) => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
                current.push(map_point(&ts, p.x, p.y));
                last = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                current.push(map_point(&ts, p.x, p.y));
                last = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        current.push(map_point(&ts, line.to.x, line.to.y));
                    });
                } else {
                    current.push(map_point(&ts, p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        current.push(map_point(&ts, line.to.x, line.to.y));
                    });
                } else {
                    current.push(map_point(&ts, p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::Close => {}
        }
    }
    if !current.is_empty() {
        rings.push(current);
    }

    let mut rings = rings.into_iter().map(clean_ring).filter(|r| r.len() >= 3);
    let outer = rings.next()?;
    let holes: Vec<Vec<Point>> = rings.collect();

    let id = path.id();
    let mut polygon = Polygon::with_holes(outer, holes);
    polygon.id = (!id.is_empty()).then(|| id.to_string());
    Some(polygon)
}

/// Drop consecutive duplicates left by flattening, and a closing point that
/// repeats the first.
fn clean_ring(mut ring: Vec<Point>) -> Vec<Point> {
    ring.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    if ring.len() > 1 && ring[0].distance(ring[ring.len() - 1]) < 1e-6 {
        ring.pop();
    }
    ring
}

// ============================================================================
// TESTS
// ============================================================================
