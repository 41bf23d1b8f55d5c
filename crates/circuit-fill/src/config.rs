//! Generation options.
//!
//! Options deserialize from YAML/JSON with per-field defaults, so a config
//! file only needs the keys it wants to change. Keys are snake_case; the
//! camelCase spellings (`lineLengthMin`, `patternScale`, ...) are accepted as
//! aliases.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::geometry::Point;

/// Candidate layout style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// One straight segment per grid point.
    Grid,
    /// Randomly seeded polylines with up to two 45° turns.
    #[default]
    Organic,
}

impl Style {
    pub fn name(&self) -> &'static str {
        match self {
            Style::Grid => "grid",
            Style::Organic => "organic",
        }
    }

    pub fn from_name(name: &str) -> Option<Style> {
        match name.to_lowercase().as_str() {
            "grid" => Some(Style::Grid),
            "organic" | "random" => Some(Style::Organic),
            _ => None,
        }
    }
}

/// Stroke gradient kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    None,
    Linear,
    Radial,
}

impl GradientType {
    pub fn name(&self) -> &'static str {
        match self {
            GradientType::None => "none",
            GradientType::Linear => "linear",
            GradientType::Radial => "radial",
        }
    }

    pub fn from_name(name: &str) -> Option<GradientType> {
        match name.to_lowercase().as_str() {
            "none" | "flat" => Some(GradientType::None),
            "linear" => Some(GradientType::Linear),
            "radial" => Some(GradientType::Radial),
            _ => None,
        }
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Grid spacing (grid style) or seed density (organic style).
    pub density: f64,

    #[serde(alias = "lineLengthMin")]
    pub line_length_min: f64,

    #[serde(alias = "lineLengthMax")]
    pub line_length_max: f64,

    /// Average length; when set it overrides min/max with `[0.5·avg, 1.5·avg]`.
    #[serde(alias = "lineLengthAvg", skip_serializing_if = "Option::is_none")]
    pub line_length_avg: Option<f64>,

    #[serde(alias = "lineThickness")]
    pub line_thickness: f64,

    #[serde(alias = "circleRadius")]
    pub circle_radius: f64,

    pub style: Style,

    #[serde(alias = "lineColor")]
    pub line_color: String,

    #[serde(alias = "gradientType")]
    pub gradient_type: GradientType,

    #[serde(alias = "gradientColor")]
    pub gradient_color: String,

    /// Gradient geometry in output coordinates.
    #[serde(alias = "gradientStart", skip_serializing_if = "Option::is_none")]
    pub gradient_start: Option<Point>,

    #[serde(alias = "gradientEnd", skip_serializing_if = "Option::is_none")]
    pub gradient_end: Option<Point>,

    /// Output units per generation unit.
    #[serde(alias = "patternScale")]
    pub pattern_scale: f64,

    /// Random seed; `None` uses [`DEFAULT_SEED`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Extra organic candidates branching off earlier candidates' ends, as a
    /// fraction of the primary candidate count.
    #[serde(alias = "branchRatio")]
    pub branch_ratio: f64,
}

/// Seed used when [`Options::seed`] is unset.
pub const DEFAULT_SEED: u64 = 0;

impl Default for Options {
    fn default() -> Self {
        Self {
            density: 20.0,
            line_length_min: 20.0,
            line_length_max: 150.0,
            line_length_avg: None,
            line_thickness: 2.0,
            circle_radius: 4.0,
            style: Style::Organic,
            line_color: "#00d084".to_string(),
            gradient_type: GradientType::None,
            gradient_color: "#0077ff".to_string(),
            gradient_start: None,
            gradient_end: None,
            pattern_scale: 1.0,
            seed: None,
            branch_ratio: 0.0,
        }
    }
}

impl Options {
    /// Effective (min, max) candidate length in generation units.
    pub fn length_range(&self) -> (f64, f64) {
        match self.line_length_avg {
            Some(avg) => (avg * 0.5, avg * 1.5),
            None => (self.line_length_min, self.line_length_max),
        }
    }

    pub fn seed_or_default(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Check ranges and colors.
    pub fn validate(&self) -> Result<(), GenerateError> {
        positive("density", self.density)?;
        positive("pattern_scale", self.pattern_scale)?;
        non_negative("line_thickness", self.line_thickness)?;
        non_negative("circle_radius", self.circle_radius)?;

        if let Some(avg) = self.line_length_avg {
            positive("line_length_avg", avg)?;
        }
        let (min, max) = self.length_range();
        positive("line_length_min", min)?;
        if max < min {
            return Err(GenerateError::InvalidOption {
                name: "line_length_max",
                reason: format!("{max} is smaller than line_length_min {min}"),
            });
        }

        if !(0.0..=1.0).contains(&self.branch_ratio) {
            return Err(GenerateError::InvalidOption {
                name: "branch_ratio",
                reason: format!("{} is outside 0..=1", self.branch_ratio),
            });
        }

        color("line_color", &self.line_color)?;
        color("gradient_color", &self.gradient_color)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), GenerateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GenerateError::InvalidOption { name, reason: format!("{value} must be > 0") })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), GenerateError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GenerateError::InvalidOption { name, reason: format!("{value} must be >= 0") })
    }
}

fn color(name: &'static str, value: &str) -> Result<(), GenerateError> {
    svgtypes::Color::from_str(value)
        .map(|_| ())
        .map_err(|e| GenerateError::InvalidOption { name, reason: format!("'{value}': {e}") })
}
