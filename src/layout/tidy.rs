use crate::config::LayoutConfig;

use super::{LayoutNode, LayoutTree, NodeIdx};

/// Direction in which depth grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Rightward,
    Downward,
}

impl Flow {
    /// Node size along the packing axis.
    fn extent(self, node: &LayoutNode<'_>) -> f32 {
        match self {
            Flow::Rightward => node.height,
            Flow::Downward => node.width,
        }
    }

    fn spacing(self, config: &LayoutConfig) -> f32 {
        match self {
            Flow::Rightward => config.vertical_spacing,
            Flow::Downward => config.horizontal_spacing,
        }
    }

    fn depth_step(self, config: &LayoutConfig) -> f32 {
        match self {
            Flow::Rightward => config.horizontal_spacing + config.level_margin,
            Flow::Downward => config.vertical_spacing + config.level_margin,
        }
    }
}

struct Bands {
    flow: Flow,
    extents: Vec<f32>,
    depth_origin: f32,
    depth_step: f32,
}

impl Bands {
    fn new(tree: &LayoutTree<'_>, flow: Flow, depth_origin: f32, config: &LayoutConfig) -> Self {
        Self {
            flow,
            extents: subtree_extents(tree, flow, flow.spacing(config)),
            depth_origin,
            depth_step: flow.depth_step(config),
        }
    }

    fn extent(&self, idx: NodeIdx) -> f32 {
        self.extents[idx.0]
    }

    fn total(&self, nodes: &[NodeIdx]) -> f32 {
        nodes.iter().map(|idx| self.extent(*idx)).sum()
    }

    /// Centres `idx` inside the band starting at `band_start` and stacks its
    /// children in order inside the same band.
    fn place(&self, tree: &mut LayoutTree<'_>, idx: NodeIdx, band_start: f32) {
        let extent = self.extent(idx);
        let node = tree.node_mut(idx);
        let along = band_start + extent / 2.0 - self.flow.extent(node) / 2.0;
        let across = self.depth_origin + node.depth as f32 * self.depth_step;
        match self.flow {
            Flow::Rightward => {
                node.y = along;
                node.x = across;
            }
            Flow::Downward => {
                node.x = along;
                node.y = across;
            }
        }
        let children = node.children.clone();
        let mut cursor = band_start + (extent - self.total(&children)) / 2.0;
        for child in children {
            self.place(tree, child, cursor);
            cursor += self.extent(child);
        }
    }

    fn place_group(&self, tree: &mut LayoutTree<'_>, group: &[NodeIdx], center: f32) {
        let mut cursor = center - self.total(group) / 2.0;
        for idx in group {
            self.place(tree, *idx, cursor);
            cursor += self.extent(*idx);
        }
    }
}

/// Band size of every subtree along the packing axis. A leaf takes its own
/// extent plus spacing; a parent takes the larger of that and the sum of
/// its children's bands.
fn subtree_extents(tree: &LayoutTree<'_>, flow: Flow, spacing: f32) -> Vec<f32> {
    let mut extents = vec![0.0; tree.len()];
    // Pre-order storage: every child sits after its parent.
    for idx in (0..tree.len()).rev() {
        let node = tree.node(NodeIdx(idx));
        let own = flow.extent(node) + spacing;
        let stacked: f32 = node.children.iter().map(|c| extents[c.0]).sum();
        extents[idx] = own.max(stacked);
    }
    extents
}

pub(super) fn assign_horizontal<'a>(
    mut tree: LayoutTree<'a>,
    config: &LayoutConfig,
    mirrored: bool,
) -> LayoutTree<'a> {
    let root_x = -tree.root().width / 2.0;
    let bands = Bands::new(&tree, Flow::Rightward, root_x, config);
    bands.place_group(&mut tree, &[LayoutTree::ROOT], 0.0);
    if mirrored {
        mirror_x(&mut tree, LayoutTree::ROOT);
    }
    tree
}

pub(super) fn assign_vertical<'a>(mut tree: LayoutTree<'a>, config: &LayoutConfig) -> LayoutTree<'a> {
    let bands = Bands::new(&tree, Flow::Downward, 0.0, config);
    bands.place_group(&mut tree, &[LayoutTree::ROOT], 0.0);
    tree
}

pub(super) fn assign_balanced<'a>(mut tree: LayoutTree<'a>, config: &LayoutConfig) -> LayoutTree<'a> {
    let root_x = -tree.root().width / 2.0;
    let bands = Bands::new(&tree, Flow::Rightward, root_x, config);
    let root = tree.node_mut(LayoutTree::ROOT);
    root.x = root_x;
    root.y = -root.height / 2.0;

    let children = tree.root().children.clone();
    let extents: Vec<f32> = children.iter().map(|c| bands.extent(*c)).collect();
    let split = balanced_split(&extents);
    let (right, left) = children.split_at(split);
    tracing::debug!(right = right.len(), left = left.len(), "balanced split");

    bands.place_group(&mut tree, right, 0.0);
    bands.place_group(&mut tree, left, 0.0);
    for idx in left {
        mirror_x(&mut tree, *idx);
    }
    tree
}

/// Number of leading children that go to the right-hand side: the prefix
/// length that minimises the difference between both sides' band totals.
/// Ties resolve to the shorter prefix.
pub(super) fn balanced_split(extents: &[f32]) -> usize {
    if extents.is_empty() {
        return 0;
    }
    let total: f32 = extents.iter().sum();
    let mut best = (1, f32::INFINITY);
    let mut prefix = 0.0;
    for (idx, extent) in extents.iter().enumerate() {
        prefix += extent;
        let imbalance = (prefix - (total - prefix)).abs();
        if imbalance < best.1 {
            best = (idx + 1, imbalance);
        }
    }
    best.0
}

fn mirror_x(tree: &mut LayoutTree<'_>, idx: NodeIdx) {
    for member in tree.subtree(idx) {
        let node = tree.node_mut(member);
        node.x = -node.x - node.width;
    }
}
