//! Region masks - the containment oracle the engine fills.
//!
//! The engine never sees how a region was authored. It only asks two things
//! of it: "is this point inside?" and "what box do I need to cover?". Those
//! two questions are the [`ContainmentPredicate`] trait, implemented by
//! bitmaps, polygons and OR-combined shape sets.
//!
//! All coordinates here are mask-native (output space, unscaled).

use crate::error::GenerateError;
use crate::geometry::{Bounds, Point, Polygon};

/// Red-channel value below which a pixel counts as inside.
pub const INSIDE_THRESHOLD: u8 = 128;

/// A region the engine can fill.
///
/// ## Rust Lesson #14: Traits
///
/// A trait is an interface. The candidate filter and the pipeline are
/// generic over `M: ContainmentPredicate + ?Sized`, so they work with any
/// mask type, including `&dyn ContainmentPredicate`.
pub trait ContainmentPredicate {
    /// Whether `p` lies inside the region. Points outside the mask extent
    /// are simply outside.
    fn contains(&self, p: Point) -> bool;

    /// Box covering every inside point, or `None` when nothing is inside.
    fn bounds(&self) -> Option<Bounds>;
}

impl<T: ContainmentPredicate + ?Sized> ContainmentPredicate for &T {
    fn contains(&self, p: Point) -> bool {
        (**self).contains(p)
    }

    fn bounds(&self) -> Option<Bounds> {
        (**self).bounds()
    }
}

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a polygon ring using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside.
#[inline]
pub fn point_in_polygon(px: f64, py: f64, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

// ============================================================================
// BITMAP MASK
// ============================================================================

/// A W×H raster mask at native canvas resolution.
///
/// Pixel `(x, y)` covers the unit square `[x, x+1) × [y, y+1)`.
#[derive(Debug, Clone)]
pub struct BitmapMask {
    width: u32,
    height: u32,
    inside: Vec<bool>,
    bounds: Option<Bounds>,
}

impl BitmapMask {
    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut inside = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                inside.push(f(x, y));
            }
        }
        Self::from_cells(width, height, inside)
    }

    /// Build a mask from packed RGBA bytes: a pixel is inside iff its red
    /// channel is below [`INSIDE_THRESHOLD`]. Missing trailing bytes count
    /// as outside.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        Self::from_fn(width, height, |x, y| {
            let idx = (y as usize * width as usize + x as usize) * 4;
            rgba.get(idx).is_some_and(|&red| red < INSIDE_THRESHOLD)
        })
    }

    /// Build a mask from any decoded image (dark = inside).
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.as_raw())
    }

    fn from_cells(width: u32, height: u32, inside: Vec<bool>) -> Self {
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        let mut any = false;

        for y in 0..height {
            for x in 0..width {
                if inside[y as usize * width as usize + x as usize] {
                    any = true;
                    min = (min.0.min(x), min.1.min(y));
                    max = (max.0.max(x), max.1.max(y));
                }
            }
        }

        let bounds = any.then(|| {
            Bounds::new(min.0 as f64, min.1 as f64, (max.0 + 1) as f64, (max.1 + 1) as f64)
        });

        Self { width, height, inside, bounds }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of inside pixels.
    pub fn inside_count(&self) -> usize {
        self.inside.iter().filter(|&&v| v).count()
    }

    /// Pixel lookup with explicit bounds checking.
    #[inline]
    pub fn is_inside_pixel(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.inside[(y as usize) * self.width as usize + x as usize]
    }
}

impl ContainmentPredicate for BitmapMask {
    #[inline]
    fn contains(&self, p: Point) -> bool {
        if !p.x.is_finite() || !p.y.is_finite() {
            return false;
        }
        self.is_inside_pixel(p.x.floor() as i64, p.y.floor() as i64)
    }

    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

// ============================================================================
// POLYGON MASK & SHAPES
// ============================================================================

/// A polygon (with holes) tested by ray casting.
#[derive(Debug, Clone)]
pub struct PolygonMask {
    pub polygon: Polygon,
}

impl PolygonMask {
    pub fn new(polygon: Polygon) -> Self {
        Self { polygon }
    }
}

impl ContainmentPredicate for PolygonMask {
    fn contains(&self, p: Point) -> bool {
        self.polygon.contains(p)
    }

    fn bounds(&self) -> Option<Bounds> {
        if self.polygon.outer.len() < 3 || self.polygon.area() <= 0.0 {
            return None;
        }
        self.polygon.bounding_box()
    }
}

/// A single region shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Polygon(Polygon),
    Rect(Bounds),
    Ellipse { center: Point, rx: f64, ry: f64 },
}

impl ContainmentPredicate for Shape {
    fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Polygon(polygon) => polygon.contains(p),
            Shape::Rect(rect) => rect.contains(p),
            Shape::Ellipse { center, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Polygon(polygon) => PolygonMask::new(polygon.clone()).bounds(),
            Shape::Rect(rect) => (rect.area() > 0.0).then_some(*rect),
            Shape::Ellipse { center, rx, ry } => (*rx > 0.0 && *ry > 0.0).then(|| {
                Bounds::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry)
            }),
        }
    }
}

/// A shape with a user-visible name (element id, layer name, ...).
#[derive(Debug, Clone)]
pub struct NamedShape {
    pub name: String,
    pub shape: Shape,
}

impl NamedShape {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self { name: name.into(), shape }
    }
}

/// Several shapes combined with logical OR.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    shapes: Vec<NamedShape>,
}

impl ShapeSet {
    /// Combine shapes. An empty list is `EmptyInput`.
    pub fn new(shapes: Vec<NamedShape>) -> Result<Self, GenerateError> {
        if shapes.is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[NamedShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ContainmentPredicate for ShapeSet {
    fn contains(&self, p: Point) -> bool {
        self.shapes.iter().any(|named| named.shape.contains(p))
    }

    fn bounds(&self) -> Option<Bounds> {
        self.shapes
            .iter()
            .filter_map(|named| named.shape.bounds())
            .reduce(|acc, b| acc.union(&b))
    }
}
