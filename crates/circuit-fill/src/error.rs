//! Error types for circuit-fill.
//!
//! Generation has exactly two input failures a caller should expect
//! (`NoValidRegion`, `EmptyInput`) plus option validation. Everything else in
//! the pipeline resolves locally and never surfaces as an error.

use thiserror::Error;

/// Errors returned by a generation call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// The mask or shape set has no usable area.
    #[error("region has no usable area, nothing to generate")]
    NoValidRegion,

    /// No shapes were supplied.
    #[error("no shapes supplied")]
    EmptyInput,

    /// An option value is out of range or unparseable.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

/// Errors from reading a region out of an SVG document.
#[derive(Error, Debug)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("no closed shapes found in SVG")]
    NoShapes,
}

/// Errors from writing a scene as an SVG document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("exported document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
