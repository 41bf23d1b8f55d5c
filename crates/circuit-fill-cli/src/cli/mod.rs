//! CLI command implementations.
//!
//! - `fill` - Generate a trace pattern for an SVG or PNG region
//! - `defaults` - Print the default options as a YAML config

pub mod common;
pub mod fill;

pub use fill::{FillArgs, cmd_defaults, cmd_fill};
