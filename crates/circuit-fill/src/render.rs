//! Renderer - turn a [`Pattern`] into a backend-neutral scene.
//!
//! The scene is a flat list of stroked, unfilled drawables sharing one paint
//! (a flat color or a gradient). Backends only have to walk the list; see
//! [`export`](crate::export) for the SVG one.

use serde::Serialize;

use crate::config::GradientType;
use crate::geometry::Point;
use crate::pattern::Pattern;

/// Radius used for radial gradients whose start and end coincide.
pub const FALLBACK_RADIAL_RADIUS: f64 = 50.0;

/// Fork pads are drawn slightly larger than end pads.
pub const FORK_CIRCLE_FACTOR: f64 = 1.2;

/// Id of the single gradient definition in a scene.
pub const GRADIENT_ID: &str = "circuit-gradient";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    /// 0.0 ..= 1.0
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Gradient {
    Linear { id: String, start: Point, end: Point, stops: Vec<GradientStop> },
    Radial { id: String, center: Point, radius: f64, stops: Vec<GradientStop> },
}

impl Gradient {
    pub fn id(&self) -> &str {
        match self {
            Gradient::Linear { id, .. } | Gradient::Radial { id, .. } => id,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }
}

/// Stroke paint shared by every drawable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Paint {
    Color(String),
    /// Reference to a gradient by id.
    Gradient(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Drawable {
    Line { from: Point, to: Point },
    Polyline { points: Vec<Point> },
    Circle { center: Point, radius: f64 },
}

/// Everything needed to draw a pattern on a `width` x `height` canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub gradient: Option<Gradient>,
    pub paint: Paint,
    pub stroke_width: f64,
    pub items: Vec<Drawable>,
}

/// Build the scene for `pattern` on a canvas of the given size.
///
/// Segments come first, then end pads, then fork pads.
pub fn render(pattern: &Pattern, width: f64, height: f64) -> Scene {
    let gradient = gradient_for(pattern, width, height);
    let paint = match &gradient {
        Some(g) => Paint::Gradient(g.id().to_string()),
        None => Paint::Color(pattern.line_color.clone()),
    };

    let mut items =
        Vec::with_capacity(pattern.segments.len() + pattern.circles.len() + pattern.forks.len());

    for segment in &pattern.segments {
        if segment.is_straight() {
            items.push(Drawable::Line { from: segment.start(), to: segment.end() });
        } else {
            items.push(Drawable::Polyline { points: segment.points().to_vec() });
        }
    }

    items.extend(
        pattern
            .circles
            .iter()
            .map(|&center| Drawable::Circle { center, radius: pattern.circle_radius }),
    );

    items.extend(pattern.forks.iter().map(|f| Drawable::Circle {
        center: f.point,
        radius: pattern.circle_radius * FORK_CIRCLE_FACTOR,
    }));

    Scene { width, height, gradient, paint, stroke_width: pattern.line_thickness, items }
}

fn gradient_for(pattern: &Pattern, width: f64, height: f64) -> Option<Gradient> {
    let stops = vec![
        GradientStop { offset: 0.0, color: pattern.line_color.clone() },
        GradientStop { offset: 1.0, color: pattern.gradient_color.clone() },
    ];
    let id = GRADIENT_ID.to_string();

    match pattern.gradient_type {
        GradientType::None => None,
        GradientType::Linear => Some(Gradient::Linear {
            id,
            start: pattern.gradient_start.unwrap_or(Point::new(0.0, 0.0)),
            end: pattern.gradient_end.unwrap_or(Point::new(width, 0.0)),
            stops,
        }),
        GradientType::Radial => {
            let center = pattern.gradient_start.unwrap_or(Point::new(width / 2.0, height / 2.0));
            let edge = pattern.gradient_end.unwrap_or(Point::new(width, height / 2.0));
            let radius = match center.distance(edge) {
                r if r > 0.0 => r,
                _ => FALLBACK_RADIAL_RADIUS,
            };
            Some(Gradient::Radial { id, center, radius, stops })
        }
    }
}
