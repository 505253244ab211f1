mod bounds;
mod collision;
pub mod drag;
mod radial;
pub mod routing;
mod sizing;
mod tidy;
mod tree;
pub(crate) mod types;
pub use types::*;

pub use bounds::compute_bounds;
pub use collision::resolve_collisions;
pub use drag::{CrossingGuard, DragOutcome, DragSession, DragState, DragStep};
pub use radial::ring_radius;
pub use routing::{Anchor, EdgeSide, RoutedEdge, route_edge, route_edges};
pub use sizing::{ICON_RESERVE, NodeSizer, apply_sizes};
pub use tree::build_tree;

use crate::config::{LayoutConfig, Paradigm};
use crate::ir::SourceNode;
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;

/// Places every node of an already sized tree for `paradigm`.
pub fn assign_positions<'a>(
    paradigm: Paradigm,
    tree: LayoutTree<'a>,
    config: &LayoutConfig,
) -> LayoutTree<'a> {
    match paradigm {
        Paradigm::Radial => radial::assign_radial(tree, config),
        Paradigm::HorizontalRight => tidy::assign_horizontal(tree, config, false),
        Paradigm::HorizontalLeft => tidy::assign_horizontal(tree, config, true),
        Paradigm::Vertical => tidy::assign_vertical(tree, config),
        Paradigm::Balanced => tidy::assign_balanced(tree, config),
    }
}

/// Runs the whole pipeline: build, size, place, de-overlap, measure bounds.
pub fn compute_layout<'a>(
    root: &'a SourceNode,
    theme: &Theme,
    config: &LayoutConfig,
    measurer: &dyn TextMeasure,
) -> LayoutResult<'a> {
    let paradigm = config.paradigm;
    let tree = build_tree(root, config.max_depth);
    tracing::debug!(nodes = tree.len(), paradigm = paradigm.as_str(), "layout start");

    let sizer = NodeSizer::new(measurer, theme, config);
    let tree = apply_sizes(tree, &sizer);
    let tree = assign_positions(paradigm, tree, config);
    let tree = resolve_collisions(tree, paradigm, config);
    let bounds = compute_bounds(&tree, config.export.padding);
    let edges = tree.edges();

    tracing::debug!(
        width = bounds.width,
        height = bounds.height,
        edges = edges.len(),
        "layout done"
    );
    LayoutResult {
        paradigm,
        tree,
        edges,
        width: bounds.width,
        height: bounds.height,
        offset_x: bounds.offset_x,
        offset_y: bounds.offset_y,
    }
}
