//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use circuit_fill::{BitmapMask, ContainmentPredicate, Options, ShapeSet, load_region};

/// A loaded fill region and the canvas it lives on.
pub struct Region {
    pub mask: Box<dyn ContainmentPredicate>,
    pub width: f64,
    pub height: f64,
}

/// Raster formats accepted as masks.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Load a region from an SVG document (closed shapes) or a raster mask
/// (dark pixels are inside).
pub fn load_region_file(path: &Path) -> Result<Region> {
    if is_raster(path) {
        let image = image::open(path)
            .with_context(|| format!("reading mask image {}", path.display()))?;
        let mask = BitmapMask::from_image(&image);
        tracing::info!(
            width = mask.width(),
            height = mask.height(),
            inside = mask.inside_count(),
            "loaded bitmap mask"
        );
        return Ok(Region {
            width: mask.width() as f64,
            height: mask.height() as f64,
            mask: Box::new(mask),
        });
    }

    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let region = load_region(&content)
        .with_context(|| format!("loading region from {}", path.display()))?;
    tracing::info!(
        shapes = region.shapes.len(),
        width = region.width,
        height = region.height,
        "loaded SVG region"
    );

    Ok(Region {
        width: region.width,
        height: region.height,
        mask: Box::new(ShapeSet::new(region.shapes)?),
    })
}

/// Read options from a YAML (or JSON) config file, or the defaults.
pub fn load_options(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let options: Options = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(options)
}

/// Write `content` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("writing to stdout")?;
            stdout.flush().context("flushing stdout")?;
        }
    }
    Ok(())
}

/// Rasterize an SVG document to PNG with resvg.
pub fn write_png(
    svg_content: &str,
    png_path: &Path,
    scale: f64,
    width: f64,
    height: f64,
) -> Result<()> {
    use resvg::usvg;
    use tiny_skia::Pixmap;

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).context("re-parsing generated SVG")?;

    let pixmap_width = (width * scale).ceil() as u32;
    let pixmap_height = (height * scale).ceil() as u32;

    let Some(mut pixmap) = Pixmap::new(pixmap_width, pixmap_height) else {
        bail!("cannot create a {pixmap_width}x{pixmap_height} pixmap");
    };

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .save_png(png_path)
        .with_context(|| format!("writing {}", png_path.display()))?;
    tracing::info!(
        path = %png_path.display(),
        width = pixmap_width,
        height = pixmap_height,
        "wrote PNG"
    );
    Ok(())
}
