//! # circuit-fill
//!
//! Procedural circuit-board trace patterns: fill a region with non-crossing
//! traces, pads at free ends and junction markers where traces meet.
//!
//! ```
//! use circuit_fill::{generate, render, to_svg_document, ExportOptions, Options, Shape, Bounds};
//!
//! let region = Shape::Rect(Bounds::new(0.0, 0.0, 200.0, 120.0));
//! let pattern = generate(&region, &Options::default()).unwrap();
//! let scene = render(&pattern, 200.0, 120.0);
//! let svg = to_svg_document(&scene, &ExportOptions::default()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Every module is declared here explicitly. `pub mod` exposes the module
//! path (`circuit_fill::placement::Clearance`), `pub use` flattens the
//! common entry points to the crate root.

pub mod candidates;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod forks;
pub mod geometry;
pub mod mask;
pub mod pattern;
pub mod placement;
pub mod proximity;
pub mod render;
pub mod rng;
pub mod segment;
pub mod shorten;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use config::{GradientType, Options, Style, DEFAULT_SEED};
pub use error::{ExportError, GenerateError, SvgError};
pub use export::{to_svg_document, ExportOptions};
pub use forks::{Fork, ForkKind};
pub use geometry::{Bounds, Point, Polygon};
pub use mask::{BitmapMask, ContainmentPredicate, NamedShape, PolygonMask, Shape, ShapeSet};
pub use pattern::{generate, generate_from_shapes, generate_with_rng, Pattern};
pub use render::{render, Scene};
pub use rng::Rng;
pub use segment::Segment;
pub use svg::{extract_shapes_from_svg, load_region, SvgRegion};
