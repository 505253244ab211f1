use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::f32::consts::TAU;

use crate::config::{LayoutConfig, Paradigm};

use super::{LayoutNode, LayoutTree, NodeIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackAxis {
    X,
    Y,
}

impl PackAxis {
    fn start(self, node: &LayoutNode<'_>) -> f32 {
        match self {
            PackAxis::X => node.x,
            PackAxis::Y => node.y,
        }
    }

    fn size(self, node: &LayoutNode<'_>) -> f32 {
        match self {
            PackAxis::X => node.width,
            PackAxis::Y => node.height,
        }
    }

    /// Which side of the root a node sits on, across the packing axis.
    fn side(self, node: &LayoutNode<'_>, root: &LayoutNode<'_>) -> Ordering {
        let (node_c, root_c) = match self {
            PackAxis::X => (node.center().y, root.center().y),
            PackAxis::Y => (node.center().x, root.center().x),
        };
        node_c.total_cmp(&root_c)
    }
}

pub fn resolve_collisions<'a>(
    tree: LayoutTree<'a>,
    paradigm: Paradigm,
    config: &LayoutConfig,
) -> LayoutTree<'a> {
    match paradigm {
        Paradigm::Radial => resolve_radial(tree, config),
        Paradigm::Vertical => sweep(tree, PackAxis::X, config.collision_padding),
        Paradigm::HorizontalRight | Paradigm::HorizontalLeft | Paradigm::Balanced => {
            sweep(tree, PackAxis::Y, config.collision_padding)
        }
    }
}

/// Order-preserving sweep: per depth (and side of the root), nodes keep the
/// order they had before any shift and are pushed forward until they clear
/// their predecessor. Shifts carry the whole subtree.
fn sweep<'a>(mut tree: LayoutTree<'a>, axis: PackAxis, padding: f32) -> LayoutTree<'a> {
    let mut pushes = 0usize;
    for level in tree.levels().into_iter().skip(1) {
        let mut groups: BTreeMap<Ordering, Vec<NodeIdx>> = BTreeMap::new();
        for idx in level {
            let side = axis.side(tree.node(idx), tree.root());
            groups.entry(side).or_default().push(idx);
        }
        for mut group in groups.into_values() {
            group.sort_by(|a, b| {
                axis.start(tree.node(*a))
                    .total_cmp(&axis.start(tree.node(*b)))
                    .then(a.cmp(b))
            });
            for pair in group.windows(2) {
                let (prev, curr) = (tree.node(pair[0]), tree.node(pair[1]));
                let required = axis.start(prev) + axis.size(prev) + padding;
                let overlap = required - axis.start(curr);
                if overlap > 0.0 {
                    let (dx, dy) = match axis {
                        PackAxis::X => (overlap, 0.0),
                        PackAxis::Y => (0.0, overlap),
                    };
                    tree.translate_subtree(pair[1], dx, dy);
                    pushes += 1;
                }
            }
        }
    }
    tracing::debug!(pushes, ?axis, "collision sweep done");
    tree
}

/// Per ring, pushes overlapping angular neighbours apart along the tangent at
/// their mid angle, keeping them on their ring.
fn resolve_radial<'a>(mut tree: LayoutTree<'a>, config: &LayoutConfig) -> LayoutTree<'a> {
    let padding = config.collision_padding;
    let mut pushes = 0usize;
    for mut ring in tree.levels().into_iter().skip(1) {
        if ring.len() < 2 {
            continue;
        }
        ring.sort_by(|a, b| {
            let angle = |idx: &NodeIdx| tree.node(*idx).angle.unwrap_or(0.0);
            angle(a).total_cmp(&angle(b)).then(a.cmp(b))
        });
        // Rings of three or more also close the circle: last against first.
        let pair_count = if ring.len() >= 3 {
            ring.len()
        } else {
            ring.len() - 1
        };
        for _ in 0..config.radial.collision_passes {
            let mut moved = false;
            for i in 0..pair_count {
                let wraps = i + 1 == ring.len();
                let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
                let (node_a, node_b) = (tree.node(a), tree.node(b));
                let (overlap_x, overlap_y) = node_a.rect().overlap(&node_b.rect());
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                let angle_a = node_a.angle.unwrap_or(0.0);
                let mut angle_b = node_b.angle.unwrap_or(0.0);
                if wraps {
                    angle_b += TAU;
                }
                let mid = (angle_a + angle_b) / 2.0;
                let push = overlap_x.min(overlap_y) / 2.0 + padding / 2.0;
                let (tx, ty) = (-mid.sin(), mid.cos());
                tracing::trace!(a = %node_a.id, b = %node_b.id, push, "tangential push");
                tree.translate_subtree(a, -tx * push, -ty * push);
                tree.translate_subtree(b, tx * push, ty * push);
                moved = true;
                pushes += 1;
            }
            if !moved {
                break;
            }
        }
    }
    tracing::debug!(pushes, "radial collision pass done");
    tree
}
