//! Fill command implementation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use circuit_fill::{
    ExportOptions, GradientType, Options, Pattern, Style, generate, render, to_svg_document,
};

use super::common::{load_options, load_region_file, write_output, write_png};

/// Arguments of `circuit-fill fill`.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Region to fill: an SVG with closed shapes, or a raster mask (dark = inside)
    pub region: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML config with generation options; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid spacing / seed density
    #[arg(long)]
    pub density: Option<f64>,

    /// Candidate style: grid or organic
    #[arg(long, value_parser = parse_style)]
    pub style: Option<Style>,

    /// Random seed (random when omitted; the chosen seed is logged)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pattern scale: output units per generation unit
    #[arg(long)]
    pub scale: Option<f64>,

    /// Stroke gradient: none, linear or radial
    #[arg(long, value_parser = parse_gradient)]
    pub gradient: Option<GradientType>,

    /// Opaque background color
    #[arg(long)]
    pub background: Option<String>,

    /// Emit the pattern as JSON instead of SVG
    #[arg(long)]
    pub json: bool,

    /// Also rasterize the SVG to this PNG file
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// PNG scale factor
    #[arg(long, default_value_t = 1.0)]
    pub png_scale: f64,
}

fn parse_style(s: &str) -> Result<Style, String> {
    Style::from_name(s).ok_or_else(|| format!("unknown style '{s}', use 'grid' or 'organic'"))
}

fn parse_gradient(s: &str) -> Result<GradientType, String> {
    GradientType::from_name(s)
        .ok_or_else(|| format!("unknown gradient '{s}', use 'none', 'linear' or 'radial'"))
}

/// JSON output: the pattern plus what produced it.
#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: String,
    width: f64,
    height: f64,
    options: &'a Options,
    pattern: &'a Pattern,
}

/// Apply command-line overrides on top of the config file values.
fn apply_overrides(mut options: Options, args: &FillArgs) -> Options {
    if let Some(density) = args.density {
        options.density = density;
    }
    if let Some(style) = args.style {
        options.style = style;
    }
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if let Some(scale) = args.scale {
        options.pattern_scale = scale;
    }
    if let Some(gradient) = args.gradient {
        options.gradient_type = gradient;
    }
    options
}

/// Execute the fill command.
pub fn cmd_fill(args: FillArgs) -> Result<()> {
    let mut options = apply_overrides(load_options(args.config.as_deref())?, &args);
    if options.seed.is_none() {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed given, picked one");
        options.seed = Some(seed);
    }

    let region = load_region_file(&args.region)?;

    let start = Instant::now();
    let pattern = generate(region.mask.as_ref(), &options)
        .with_context(|| format!("generating pattern for {}", args.region.display()))?;
    tracing::info!(
        segments = pattern.segments.len(),
        circles = pattern.circles.len(),
        forks = pattern.forks.len(),
        seed = pattern.seed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pattern generated"
    );

    let needs_svg = !args.json || args.png.is_some();
    let svg = if needs_svg {
        let scene = render(&pattern, region.width, region.height);
        let export = ExportOptions { background: args.background.clone() };
        Some(to_svg_document(&scene, &export).context("writing SVG document")?)
    } else {
        None
    };

    let document = match (&svg, args.json) {
        (Some(svg), false) => svg.clone(),
        _ => {
            let out = JsonOutput {
                generated_at: chrono::Utc::now().to_rfc3339(),
                width: region.width,
                height: region.height,
                options: &options,
                pattern: &pattern,
            };
            serde_json::to_string_pretty(&out).context("serializing pattern")?
        }
    };
    write_output(args.output.as_deref(), &document)?;

    if let (Some(png_path), Some(svg)) = (&args.png, &svg) {
        write_png(svg, png_path, args.png_scale, region.width, region.height)?;
    }

    Ok(())
}

/// Execute the defaults command.
pub fn cmd_defaults() -> Result<()> {
    let yaml = serde_yaml::to_string(&Options::default()).context("serializing defaults")?;
    write_output(None, &yaml)
}
