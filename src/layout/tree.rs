use crate::ir::SourceNode;

use super::{LayoutNode, LayoutTree, NodeIdx};

/// Materialises the visible part of `root` as a layout tree.
///
/// Collapsed nodes and nodes at `max_depth` keep their place but get no
/// layout children. All geometry starts at zero.
pub fn build_tree(root: &SourceNode, max_depth: Option<usize>) -> LayoutTree<'_> {
    let mut nodes = Vec::with_capacity(root.count());
    push_node(root, None, 0, max_depth, &mut nodes);
    LayoutTree::from_nodes(nodes)
}

fn push_node<'a>(
    source: &'a SourceNode,
    parent: Option<NodeIdx>,
    depth: usize,
    max_depth: Option<usize>,
    nodes: &mut Vec<LayoutNode<'a>>,
) -> NodeIdx {
    let idx = NodeIdx(nodes.len());
    nodes.push(LayoutNode {
        id: source.id.clone(),
        source,
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
        depth,
        angle: None,
        children: Vec::new(),
        parent,
    });
    let depth_capped = max_depth.is_some_and(|max| depth >= max);
    if source.collapsed || depth_capped {
        return idx;
    }
    let children: Vec<NodeIdx> = source
        .children
        .iter()
        .map(|child| push_node(child, Some(idx), depth + 1, max_depth, nodes))
        .collect();
    nodes[idx.0].children = children;
    idx
}
