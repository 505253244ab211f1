use crate::config::{CurveStyle, EdgeConfig, LayoutConfig, MarkerKind, Paradigm};
use crate::theme::Theme;

use super::{LayoutEdge, LayoutResult, Point, PositionOverrides, Rect};

// ── Anchor gaps ─────────────────────────────────────────────────────
/// Clearance added beyond an arrow marker's own size.
const ARROW_GAP_EXTRA: f32 = 3.0;
/// Gap left at an end without an arrow marker.
const PLAIN_GAP: f32 = 4.0;

// ── Curve tension ───────────────────────────────────────────────────
const BEZIER_MIN_TENSION: f32 = 40.0;
const BEZIER_TENSION_RATIO: f32 = 0.4;
const ORGANIC_MIN_TENSION: f32 = 50.0;
const ORGANIC_TENSION_RATIO: f32 = 0.55;

// ── Stroke ──────────────────────────────────────────────────────────
const TAPER_PER_DEPTH: f32 = 0.5;
const MIN_TAPERED_WIDTH: f32 = 1.5;

/// Below this length a direction vector counts as zero.
const DEGENERATE_EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeSide {
    /// Outward unit normal of this face.
    pub fn normal(self) -> Point {
        match self {
            EdgeSide::Left => Point::new(-1.0, 0.0),
            EdgeSide::Right => Point::new(1.0, 0.0),
            EdgeSide::Top => Point::new(0.0, -1.0),
            EdgeSide::Bottom => Point::new(0.0, 1.0),
        }
    }

    /// Centre of this face of `rect`.
    pub fn anchor(self, rect: &Rect) -> Anchor {
        let c = rect.center();
        let point = match self {
            EdgeSide::Left => Point::new(rect.x, c.y),
            EdgeSide::Right => Point::new(rect.right(), c.y),
            EdgeSide::Top => Point::new(c.x, rect.y),
            EdgeSide::Bottom => Point::new(c.x, rect.bottom()),
        };
        Anchor {
            point,
            dir: self.normal(),
        }
    }
}

/// Where an edge meets a node, and the direction it leaves in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point,
    pub dir: Point,
}

impl Anchor {
    fn pushed_out(self, gap: f32) -> Self {
        Self {
            point: Point::new(
                self.point.x + self.dir.x * gap,
                self.point.y + self.dir.y * gap,
            ),
            dir: self.dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub id: String,
    pub depth: usize,
    pub start: Anchor,
    pub end: Anchor,
    /// SVG path data.
    pub path: String,
    pub stroke_width: f32,
    pub color: String,
    pub dash: Option<&'static str>,
}

/// Side-centre anchors for the tidy paradigms.
pub fn fixed_side_anchors(source: &Rect, target: &Rect, paradigm: Paradigm) -> (Anchor, Anchor) {
    if paradigm == Paradigm::Vertical {
        return (EdgeSide::Bottom.anchor(source), EdgeSide::Top.anchor(target));
    }
    if target.center().x >= source.center().x {
        (EdgeSide::Right.anchor(source), EdgeSide::Left.anchor(target))
    } else {
        (EdgeSide::Left.anchor(source), EdgeSide::Right.anchor(target))
    }
}

/// Where the ray from the centre of `rect` towards `toward` leaves the
/// rectangle. The direction is the normal of the face that was hit, so
/// curves leave the node square to its border.
pub fn boundary_anchor(rect: &Rect, toward: Point) -> Anchor {
    let c = rect.center();
    let (dx, dy) = (toward.x - c.x, toward.y - c.y);
    let (half_w, half_h) = (rect.width / 2.0, rect.height / 2.0);

    let mut hit: Option<(f32, EdgeSide)> = None;
    if dx.abs() > DEGENERATE_EPS {
        let side = if dx > 0.0 { EdgeSide::Right } else { EdgeSide::Left };
        hit = Some((half_w / dx.abs(), side));
    }
    if dy.abs() > DEGENERATE_EPS {
        let t = half_h / dy.abs();
        let side = if dy > 0.0 { EdgeSide::Bottom } else { EdgeSide::Top };
        if hit.is_none_or(|(best, _)| t < best) {
            hit = Some((t, side));
        }
    }
    match hit {
        Some((t, side)) if t > 0.0 => Anchor {
            point: Point::new(c.x + dx * t, c.y + dy * t),
            dir: side.normal(),
        },
        // Coincident centres or a zero-sized node.
        _ => EdgeSide::Top.anchor(rect),
    }
}

fn marker_gap(marker: MarkerKind, marker_size: f32) -> f32 {
    if marker.is_arrow() {
        marker_size + ARROW_GAP_EXTRA
    } else {
        PLAIN_GAP
    }
}

pub fn edge_path(start: Anchor, end: Anchor, curve: CurveStyle) -> String {
    let (s, e) = (start.point, end.point);
    match curve {
        CurveStyle::Straight => format!("M {:.2} {:.2} L {:.2} {:.2}", s.x, s.y, e.x, e.y),
        CurveStyle::Bezier => cubic(start, end, BEZIER_MIN_TENSION, BEZIER_TENSION_RATIO),
        CurveStyle::Organic => cubic(start, end, ORGANIC_MIN_TENSION, ORGANIC_TENSION_RATIO),
        CurveStyle::Angular => {
            // One elbow; the first leg follows the exit direction.
            let corner = if start.dir.y.abs() > start.dir.x.abs() {
                Point::new(s.x, e.y)
            } else {
                Point::new(e.x, s.y)
            };
            format!(
                "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}",
                s.x, s.y, corner.x, corner.y, e.x, e.y
            )
        }
    }
}

fn cubic(start: Anchor, end: Anchor, min_tension: f32, ratio: f32) -> String {
    let (s, e) = (start.point, end.point);
    let distance = (e.x - s.x).hypot(e.y - s.y);
    let tension = min_tension.max(distance * ratio);
    let c1 = Point::new(s.x + start.dir.x * tension, s.y + start.dir.y * tension);
    let c2 = Point::new(e.x + end.dir.x * tension, e.y + end.dir.y * tension);
    format!(
        "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
        s.x, s.y, c1.x, c1.y, c2.x, c2.y, e.x, e.y
    )
}

pub fn stroke_width(depth: usize, edges: &EdgeConfig) -> f32 {
    if edges.taper {
        (edges.thickness - TAPER_PER_DEPTH * depth as f32).max(MIN_TAPERED_WIDTH)
    } else {
        edges.thickness
    }
}

pub fn edge_color(depth: usize, theme: &Theme, edges: &EdgeConfig) -> String {
    let flat = || edges.color.clone().unwrap_or_else(|| theme.line_color.clone());
    if !edges.color_by_level {
        return flat();
    }
    let palette = if edges.palette.is_empty() {
        &theme.level_colors
    } else {
        &edges.palette
    };
    if palette.is_empty() {
        return flat();
    }
    palette[depth.saturating_sub(1) % palette.len()].clone()
}

/// Routes one edge in post-translation space, following any overrides.
pub fn route_edge(
    result: &LayoutResult<'_>,
    edge: &LayoutEdge,
    theme: &Theme,
    config: &LayoutConfig,
    overrides: &PositionOverrides,
) -> RoutedEdge {
    let source = result.node_rect(edge.source, overrides);
    let target = result.node_rect(edge.target, overrides);
    let (start, end) = match result.paradigm {
        Paradigm::Radial => (
            boundary_anchor(&source, target.center()),
            boundary_anchor(&target, source.center()),
        ),
        paradigm => fixed_side_anchors(&source, &target, paradigm),
    };
    let edges = &config.edges;
    let start = start.pushed_out(marker_gap(edges.start_marker, edges.marker_size));
    let end = end.pushed_out(marker_gap(edges.end_marker, edges.marker_size));
    RoutedEdge {
        id: edge.id.clone(),
        depth: edge.depth,
        start,
        end,
        path: edge_path(start, end, edges.curve),
        stroke_width: stroke_width(edge.depth, edges),
        color: edge_color(edge.depth, theme, edges),
        dash: edges.stroke_style.dash_array(),
    }
}

pub fn route_edges(
    result: &LayoutResult<'_>,
    theme: &Theme,
    config: &LayoutConfig,
    overrides: &PositionOverrides,
) -> Vec<RoutedEdge> {
    result
        .edges
        .iter()
        .map(|edge| route_edge(result, edge, theme, config, overrides))
        .collect()
}
