use std::f32::consts::TAU;

use crate::config::LayoutConfig;

use super::{LayoutTree, NodeIdx};

/// Radius of the ring that holds nodes at `depth`.
pub fn ring_radius(depth: usize, config: &LayoutConfig) -> f32 {
    if depth == 0 {
        return 0.0;
    }
    let base = config.horizontal_spacing + config.radial.ring_margin;
    depth as f32 * base + (depth - 1) as f32 * config.radial.depth_extra
}

pub(super) fn assign_radial<'a>(mut tree: LayoutTree<'a>, config: &LayoutConfig) -> LayoutTree<'a> {
    let root = tree.node_mut(LayoutTree::ROOT);
    root.x = -root.width / 2.0;
    root.y = -root.height / 2.0;
    let start = config.radial.start_angle;
    place_children(&mut tree, LayoutTree::ROOT, start, start + TAU, config);
    tree
}

/// Splits `[start, end)` between the children of `parent` and recurses
/// into each child's own sector. Children never leave their parent's
/// sector, so sibling subtrees cannot interleave.
fn place_children(
    tree: &mut LayoutTree<'_>,
    parent: NodeIdx,
    start: f32,
    end: f32,
    config: &LayoutConfig,
) {
    let children = tree.node(parent).children.clone();
    if children.is_empty() {
        return;
    }
    let sectors = allocate_sectors(tree, &children, end - start, config);
    let mut cursor = start;
    for (child, sector) in children.into_iter().zip(sectors) {
        let mid = cursor + sector / 2.0;
        let node = tree.node_mut(child);
        let radius = ring_radius(node.depth, config);
        node.x = radius * mid.cos() - node.width / 2.0;
        node.y = radius * mid.sin() - node.height / 2.0;
        node.angle = Some(mid);
        place_children(tree, child, cursor, cursor + sector, config);
        cursor += sector;
    }
}

/// Leaf-proportional sectors with a per-node floor, scaled down as a whole
/// when the floors push the total past `span`.
pub(super) fn allocate_sectors(
    tree: &LayoutTree<'_>,
    children: &[NodeIdx],
    span: f32,
    config: &LayoutConfig,
) -> Vec<f32> {
    let leaves: Vec<usize> = children.iter().map(|c| tree.leaf_count(*c)).collect();
    let total_leaves = leaves.iter().sum::<usize>().max(1) as f32;
    let mut sectors: Vec<f32> = children
        .iter()
        .zip(&leaves)
        .map(|(child, leaves)| {
            let node = tree.node(*child);
            let radius = ring_radius(node.depth, config).max(1.0);
            let share = span * *leaves as f32 / total_leaves;
            let floor = ((node.width.hypot(node.height) + config.radial.node_margin) / radius)
                .max(config.radial.min_sector);
            share.max(floor)
        })
        .collect();
    let required: f32 = sectors.iter().sum();
    if required > span && required > 0.0 {
        let scale = span / required;
        tracing::trace!(required, span, scale, "radial sectors scaled down");
        for sector in &mut sectors {
            *sector *= scale;
        }
    }
    sectors
}
