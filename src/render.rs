use crate::config::RenderConfig;
use crate::geometry::Side;
use crate::ir::{Anchor, EdgeKind};
use crate::store::GraphStore;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Rough glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;
const LINE_HEIGHT_RATIO: f32 = 1.3;
/// Minimum control-point distance for bezier edges.
const BEZIER_MIN_OFFSET: f32 = 20.0;
/// Straight segment leaving each anchor on step edges.
const STEP_STUB: f32 = 16.0;

type Rect = (f32, f32, f32, f32);

struct EdgeLabel {
    x: f32,
    y: f32,
    lines: Vec<String>,
    width: f32,
    height: f32,
}

pub fn render_svg(store: &GraphStore, theme: &Theme, config: &RenderConfig) -> String {
    let (min_x, min_y, max_x, max_y) = content_bounds(store);
    let pad = config.padding;
    let content_w = max_x - min_x + pad * 2.0;
    let content_h = max_y - min_y + pad * 2.0;
    // configured size is a minimum canvas; content stays centered in it
    let width = content_w.max(config.width);
    let height = content_h.max(config.height);
    let view_x = min_x - pad - (width - content_w) / 2.0;
    let view_y = min_y - pad - (height - content_h) / 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{view_x:.2} {view_y:.2} {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{view_x:.2}\" y=\"{view_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    let mut labels = Vec::new();
    for edge in store.edges() {
        let Ok([first, second]) = store.edge_anchors(&edge.id) else {
            continue;
        };
        let (source, target) = if first.node_id == edge.source_id {
            (first, second)
        } else {
            (second, first)
        };
        if source.angle.is_none() || target.angle.is_none() {
            continue;
        }
        let d = edge_path(edge.kind, source, target, config);
        svg.push_str(&format!(
            "<path id=\"edge-{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow)\"/>",
            escape_xml(&edge.id),
            d,
            theme.line_color,
            config.edge_stroke_width
        ));
        if let Some(label) = edge.label.as_deref() {
            let mid = (
                (source.position_x + target.position_x) / 2.0,
                (source.position_y + target.position_y) / 2.0,
            );
            labels.push(measure_label(label, mid, theme));
        }
    }

    for label in place_edge_labels(labels) {
        let rect_x = label.x - label.width / 2.0 - 6.0;
        let rect_y = label.y - label.height / 2.0 - 4.0;
        let rect_w = label.width + 12.0;
        let rect_h = label.height + 8.0;
        svg.push_str(&format!(
            "<rect x=\"{rect_x:.2}\" y=\"{rect_y:.2}\" width=\"{rect_w:.2}\" height=\"{rect_h:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.8\"/>",
            theme.edge_label_background,
            theme.node_border_color
        ));
        svg.push_str(&text_svg(label.x, label.y, &label.lines, theme));
    }

    for node in store.nodes() {
        let fill = node.bg_color.as_deref().unwrap_or(&theme.node_color);
        svg.push_str(&format!(
            "<rect id=\"node-{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            escape_xml(&node.id),
            node.position_x,
            node.position_y,
            node.width,
            node.height,
            fill,
            theme.node_border_color
        ));
        let (cx, cy) = node.center();
        let lines: Vec<String> = node.data.lines().map(str::to_string).collect();
        svg.push_str(&text_svg(cx, cy, &lines, theme));
    }

    // anchors last so they sit on top of node borders
    for anchor in store.anchors_all().filter(|anchor| anchor.angle.is_some()) {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            anchor.position_x,
            anchor.position_y,
            config.anchor_radius,
            theme.anchor_color,
            theme.anchor_border_color
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn content_bounds(store: &GraphStore) -> Rect {
    let mut bounds: Option<Rect> = None;
    for node in store.nodes() {
        let (x0, y0) = (node.position_x, node.position_y);
        let (x1, y1) = (x0 + node.width, y0 + node.height);
        bounds = Some(match bounds {
            None => (x0, y0, x1, y1),
            Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
        });
    }
    bounds.unwrap_or((0.0, 0.0, 0.0, 0.0))
}

/// Outward direction of an anchor; non-canonical angles fall back to trigonometry.
fn anchor_direction(anchor: &Anchor) -> (f32, f32) {
    match anchor.side() {
        Some(side) => side.direction(),
        None => {
            let radians = anchor.angle.unwrap_or(0.0).to_radians();
            (radians.cos(), -radians.sin())
        }
    }
}

fn edge_path(kind: EdgeKind, source: &Anchor, target: &Anchor, config: &RenderConfig) -> String {
    let start = source.position();
    let end = target.position();
    match kind {
        EdgeKind::Straight => points_to_path(&[start, end]),
        EdgeKind::Bezier => {
            let gap = ((end.0 - start.0).powi(2) + (end.1 - start.1).powi(2)).sqrt();
            let offset = (gap * config.bezier_curvature).max(BEZIER_MIN_OFFSET);
            let (sdx, sdy) = anchor_direction(source);
            let (tdx, tdy) = anchor_direction(target);
            format!(
                "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
                start.0,
                start.1,
                start.0 + sdx * offset,
                start.1 + sdy * offset,
                end.0 + tdx * offset,
                end.1 + tdy * offset,
                end.0,
                end.1
            )
        }
        EdgeKind::Step => points_to_path(&step_points(source, target)),
    }
}

fn step_points(source: &Anchor, target: &Anchor) -> Vec<(f32, f32)> {
    let (sdx, sdy) = anchor_direction(source);
    let (tdx, tdy) = anchor_direction(target);
    let start = source.position();
    let end = target.position();
    let s = (start.0 + sdx * STEP_STUB, start.1 + sdy * STEP_STUB);
    let t = (end.0 + tdx * STEP_STUB, end.1 + tdy * STEP_STUB);
    let leaves_horizontally = matches!(source.side(), Some(Side::Left | Side::Right)) || sdx.abs() > sdy.abs();
    let corner = if leaves_horizontally { (t.0, s.1) } else { (s.0, t.1) };
    vec![start, s, corner, t, end]
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn measure_label(text: &str, at: (f32, f32), theme: &Theme) -> EdgeLabel {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    EdgeLabel {
        x: at.0,
        y: at.1,
        width: longest as f32 * theme.font_size * CHAR_WIDTH_RATIO,
        height: lines.len().max(1) as f32 * theme.font_size * LINE_HEIGHT_RATIO,
        lines,
    }
}

/// Nudges labels downward until they stop overlapping earlier ones.
fn place_edge_labels(labels: Vec<EdgeLabel>) -> Vec<EdgeLabel> {
    let mut occupied: Vec<Rect> = Vec::new();
    let mut placed = Vec::with_capacity(labels.len());
    for mut label in labels {
        let base_y = label.y;
        let mut offset = 0.0;
        for _ in 0..6 {
            let rect = label_rect(label.x, base_y + offset, &label);
            if !collides(&rect, &occupied) {
                break;
            }
            offset += label.height + 6.0;
        }
        label.y = base_y + offset;
        occupied.push(label_rect(label.x, label.y, &label));
        placed.push(label);
    }
    placed
}

fn label_rect(x: f32, y: f32, label: &EdgeLabel) -> Rect {
    (
        x - label.width / 2.0 - 6.0,
        y - label.height / 2.0 - 4.0,
        label.width + 12.0,
        label.height + 8.0,
    )
}

fn collides(rect: &Rect, occupied: &[Rect]) -> bool {
    for (x, y, w, h) in occupied {
        if rect.0 < x + w && rect.0 + rect.2 > *x && rect.1 < y + h && rect.1 + rect.3 > *y {
            return true;
        }
    }
    false
}

fn text_svg(x: f32, y: f32, lines: &[String], theme: &Theme) -> String {
    let line_height = theme.font_size * LINE_HEIGHT_RATIO;
    let total_height = lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + theme.font_size;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        theme.font_family, theme.font_size, theme.node_text_color
    ));
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
