//! SVG document export.
//!
//! Writes a [`Scene`] as a standalone SVG sized to the canvas. Coordinates
//! are written with two decimals, matching the rest of the toolchain's SVG
//! output.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::ExportError;
use crate::geometry::Point;
use crate::render::{Drawable, Gradient, Paint, Scene};

/// Options for [`to_svg_document`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Opaque background fill; `None` leaves the canvas transparent.
    pub background: Option<String>,
}

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Xml(e.to_string())
}

fn coord(v: f64) -> String {
    format!("{v:.2}")
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serialize `scene` as an SVG document.
pub fn to_svg_document(scene: &Scene, options: &ExportOptions) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let (w, h) = (coord(scene.width), coord(scene.height));
    let view_box = format!("0 0 {w} {h}");
    let mut svg = BytesStart::new("svg");
    svg.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
    svg.push_attribute(("width", w.as_str()));
    svg.push_attribute(("height", h.as_str()));
    svg.push_attribute(("viewBox", view_box.as_str()));
    writer.write_event(Event::Start(svg)).map_err(xml_err)?;

    if let Some(gradient) = &scene.gradient {
        writer.write_event(Event::Start(BytesStart::new("defs"))).map_err(xml_err)?;
        write_gradient(&mut writer, gradient)?;
        writer.write_event(Event::End(BytesEnd::new("defs"))).map_err(xml_err)?;
    }

    if let Some(background) = &options.background {
        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("width", "100%"));
        rect.push_attribute(("height", "100%"));
        rect.push_attribute(("fill", background.as_str()));
        writer.write_event(Event::Empty(rect)).map_err(xml_err)?;
    }

    let stroke = match &scene.paint {
        Paint::Color(color) => color.clone(),
        Paint::Gradient(id) => format!("url(#{id})"),
    };
    let stroke_width = coord(scene.stroke_width);
    let mut group = BytesStart::new("g");
    group.push_attribute(("stroke", stroke.as_str()));
    group.push_attribute(("stroke-width", stroke_width.as_str()));
    group.push_attribute(("fill", "none"));
    group.push_attribute(("stroke-linecap", "round"));
    group.push_attribute(("stroke-linejoin", "round"));
    writer.write_event(Event::Start(group)).map_err(xml_err)?;

    for item in &scene.items {
        writer.write_event(Event::Empty(drawable_element(item))).map_err(xml_err)?;
    }

    writer.write_event(Event::End(BytesEnd::new("g"))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new("svg"))).map_err(xml_err)?;

    let mut doc = String::from_utf8(writer.into_inner())?;
    doc.push('\n');
    Ok(doc)
}

fn write_gradient(writer: &mut Writer<Vec<u8>>, gradient: &Gradient) -> Result<(), ExportError> {
    let (tag, element) = match gradient {
        Gradient::Linear { id, start, end, .. } => {
            let mut el = BytesStart::new("linearGradient");
            el.push_attribute(("id", id.as_str()));
            el.push_attribute(("gradientUnits", "userSpaceOnUse"));
            el.push_attribute(("x1", coord(start.x).as_str()));
            el.push_attribute(("y1", coord(start.y).as_str()));
            el.push_attribute(("x2", coord(end.x).as_str()));
            el.push_attribute(("y2", coord(end.y).as_str()));
            ("linearGradient", el)
        }
        Gradient::Radial { id, center, radius, .. } => {
            let mut el = BytesStart::new("radialGradient");
            el.push_attribute(("id", id.as_str()));
            el.push_attribute(("gradientUnits", "userSpaceOnUse"));
            el.push_attribute(("cx", coord(center.x).as_str()));
            el.push_attribute(("cy", coord(center.y).as_str()));
            el.push_attribute(("r", coord(*radius).as_str()));
            ("radialGradient", el)
        }
    };
    writer.write_event(Event::Start(element)).map_err(xml_err)?;

    for stop in gradient.stops() {
        let offset = format!("{}%", (stop.offset * 100.0).round());
        let mut el = BytesStart::new("stop");
        el.push_attribute(("offset", offset.as_str()));
        el.push_attribute(("stop-color", stop.color.as_str()));
        writer.write_event(Event::Empty(el)).map_err(xml_err)?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag))).map_err(xml_err)?;
    Ok(())
}

fn drawable_element(item: &Drawable) -> BytesStart<'static> {
    match item {
        Drawable::Line { from, to } => {
            let mut el = BytesStart::new("line");
            el.push_attribute(("x1", coord(from.x).as_str()));
            el.push_attribute(("y1", coord(from.y).as_str()));
            el.push_attribute(("x2", coord(to.x).as_str()));
            el.push_attribute(("y2", coord(to.y).as_str()));
            el
        }
        Drawable::Polyline { points } => {
            let mut el = BytesStart::new("polyline");
            el.push_attribute(("points", points_attr(points).as_str()));
            el
        }
        Drawable::Circle { center, radius } => {
            let mut el = BytesStart::new("circle");
            el.push_attribute(("cx", coord(center.x).as_str()));
            el.push_attribute(("cy", coord(center.y).as_str()));
            el.push_attribute(("r", coord(*radius).as_str()));
            el
        }
    }
}
