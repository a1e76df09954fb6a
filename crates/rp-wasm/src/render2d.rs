//! Canvas2D renderer for the editing session.
//!
//! Draws shapes in creation order, then connection lines on top, then the
//! overlays (selection outline, resize handles, link-mode pick markers).

use rp_core::{Bounds, ShapeKind};
use rp_editor::EditorSession;
use rp_render::handle_rect;
use web_sys::CanvasRenderingContext2d;

/// Fixed palette for the canvas.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub room_fill: &'static str,
    pub room_stroke: &'static str,
    pub aperture_fill: &'static str,
    pub aperture_stroke: &'static str,
    pub line: &'static str,
    pub line_highlight: &'static str,
    pub selection: &'static str,
    pub pending: &'static str,
    pub text: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            grid: "rgba(0, 0, 0, 0.05)",
            room_fill: "#DCEBFA",
            room_stroke: "#3A6EA5",
            aperture_fill: "#F7E3C4",
            aperture_stroke: "#B5651D",
            line: "#2E8B57",
            line_highlight: "#FF9F0A",
            selection: "#4FC3F7",
            pending: "#FF375F",
            text: "#1C1C1E",
        }
    }
}

pub fn render_session(
    ctx: &CanvasRenderingContext2d,
    session: &EditorSession,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);
    draw_grid(ctx, canvas_width, canvas_height, theme);

    for shape in session.registry.iter() {
        let Some(b) = session.geometry.get(shape.id) else {
            continue;
        };
        match &shape.kind {
            ShapeKind::Room { label } => {
                draw_box(ctx, &b, theme.room_fill, theme.room_stroke);
                if !label.is_empty() {
                    draw_label(ctx, &b, label, theme);
                }
            }
            ShapeKind::Aperture { .. } => {
                draw_box(ctx, &b, theme.aperture_fill, theme.aperture_stroke);
            }
        }
    }

    let highlighted = session.highlighted_lines();
    for l in session.connections() {
        let hot = highlighted.contains(l);
        ctx.set_stroke_style_str(if hot { theme.line_highlight } else { theme.line });
        ctx.set_line_width(if hot { 4.0 } else { 2.0 });
        ctx.begin_path();
        ctx.move_to(l.line.p0.x, l.line.p0.y);
        ctx.line_to(l.line.p1.x, l.line.p1.y);
        ctx.stroke();
    }

    for id in session.pending_rooms() {
        if let Some(b) = session.geometry.get(*id) {
            draw_pending_marker(ctx, &b, theme);
        }
    }

    if let Some(b) = session.selected().and_then(|id| session.geometry.get(id)) {
        draw_selection(ctx, &b, session.config.handle_size, theme);
    }
}

// ─── Drawing primitives ─────────────────────────────────────────────────

fn draw_box(ctx: &CanvasRenderingContext2d, b: &Bounds, fill: &str, stroke: &str) {
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(b.left, b.top, b.width, b.height);
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(b.left, b.top, b.width, b.height);
}

fn draw_label(ctx: &CanvasRenderingContext2d, b: &Bounds, label: &str, theme: &CanvasTheme) {
    let (cx, cy) = b.center();
    ctx.set_fill_style_str(theme.text);
    ctx.set_font("14px Inter, system-ui, sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    // Labels wider than the room are clipped to it.
    let fits = ctx
        .measure_text(label)
        .map(|m| m.width() <= b.width)
        .unwrap_or(true);
    if fits {
        let _ = ctx.fill_text(label, cx, cy);
    } else {
        ctx.save();
        ctx.begin_path();
        ctx.rect(b.left, b.top, b.width, b.height);
        ctx.clip();
        let _ = ctx.fill_text(label, cx, cy);
        ctx.restore();
    }
}

fn draw_selection(ctx: &CanvasRenderingContext2d, b: &Bounds, handle_size: f64, theme: &CanvasTheme) {
    ctx.set_stroke_style_str(theme.selection);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(b.left, b.top, b.width, b.height);

    let h = handle_rect(b, handle_size);
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_line_width(1.5);
    ctx.fill_rect(h.x0, h.y0, h.width(), h.height());
    ctx.stroke_rect(h.x0, h.y0, h.width(), h.height());
}

fn draw_pending_marker(ctx: &CanvasRenderingContext2d, b: &Bounds, theme: &CanvasTheme) {
    ctx.set_stroke_style_str(theme.pending);
    ctx.set_line_width(3.0);
    ctx.stroke_rect(b.left - 3.0, b.top - 3.0, b.width + 6.0, b.height + 6.0);
}

fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &CanvasTheme) {
    ctx.set_fill_style_str(theme.grid);
    let spacing = 20.0;
    let mut x = 0.0;
    while x < width {
        let mut y = 0.0;
        while y < height {
            ctx.fill_rect(x, y, 1.0, 1.0);
            y += spacing;
        }
        x += spacing;
    }
}
