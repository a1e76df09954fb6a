//! SVG export of the current diagram.
//!
//! Shapes paint in creation order with connection lines on top, the way
//! the interactive canvas layers them. The view box is the shapes' bounding
//! box plus a margin; an empty diagram exports a blank 800×600 sheet.

use crate::connections::ConnectionLine;
use rp_core::{GeometryModel, ShapeKind, ShapeRegistry};
use std::fmt::Write;

/// Colors and strokes used for export.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgTheme {
    pub room_fill: &'static str,
    pub room_stroke: &'static str,
    pub aperture_fill: &'static str,
    pub aperture_stroke: &'static str,
    pub line_stroke: &'static str,
    pub line_width: f64,
    pub text_fill: &'static str,
    pub font_size: f64,
}

impl Default for SvgTheme {
    fn default() -> Self {
        Self {
            room_fill: "#DCEBFA",
            room_stroke: "#3A6EA5",
            aperture_fill: "#F7E3C4",
            aperture_stroke: "#B5651D",
            line_stroke: "#2E8B57",
            line_width: 2.0,
            text_fill: "#1C1C1E",
            font_size: 14.0,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_svg(
    registry: &ShapeRegistry,
    geometry: &GeometryModel,
    lines: &[ConnectionLine],
    theme: &SvgTheme,
) -> String {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    let mut found = false;

    for id in registry.ids() {
        if let Some(b) = geometry.get(*id) {
            min_x = min_x.min(b.left);
            min_y = min_y.min(b.top);
            max_x = max_x.max(b.right());
            max_y = max_y.max(b.bottom());
            found = true;
        }
    }

    if !found {
        min_x = 0.0;
        min_y = 0.0;
        max_x = 800.0;
        max_y = 600.0;
    }

    let pad = 16.0;
    let width = max_x - min_x + pad * 2.0;
    let height = max_y - min_y + pad * 2.0;
    let offset_x = min_x - pad;
    let offset_y = min_y - pad;

    // Writing into a String cannot fail.
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; }\n");
    svg.push_str("</style>\n");
    let _ = writeln!(svg, "<g transform=\"translate({}, {})\">", -offset_x, -offset_y);

    for shape in registry.iter() {
        let Some(b) = geometry.get(shape.id) else {
            continue;
        };
        let (fill, stroke) = match shape.kind {
            ShapeKind::Room { .. } => (theme.room_fill, theme.room_stroke),
            ShapeKind::Aperture { .. } => (theme.aperture_fill, theme.aperture_stroke),
        };
        let _ = writeln!(
            svg,
            "  <rect data-id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\" />",
            escape(shape.id.as_str()),
            b.left,
            b.top,
            b.width,
            b.height,
            fill,
            stroke
        );
        if let Some(label) = shape.kind.label().filter(|l| !l.is_empty()) {
            let (cx, cy) = b.center();
            let _ = writeln!(
                svg,
                "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
                cx,
                cy,
                theme.font_size,
                theme.text_fill,
                escape(label)
            );
        }
    }

    for l in lines {
        let _ = writeln!(
            svg,
            "  <line data-aperture=\"{}\" data-room=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" />",
            escape(l.aperture.as_str()),
            escape(l.room.as_str()),
            l.line.p0.x,
            l.line.p0.y,
            l.line.p1.x,
            l.line.p1.y,
            theme.line_stroke,
            theme.line_width
        );
    }

    svg.push_str("</g>\n</svg>");
    svg
}
