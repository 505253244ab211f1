use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Paradigm;
use crate::ir::SourceNode;

/// Index of a node inside a [`LayoutTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Manual position corrections keyed by node id, in post-translation space.
pub type PositionOverrides = BTreeMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap extents along x and y. Both are positive only when the
    /// rectangles intersect.
    pub fn overlap(&self, other: &Rect) -> (f32, f32) {
        (
            self.right().min(other.right()) - self.x.max(other.x),
            self.bottom().min(other.bottom()) - self.y.max(other.y),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub id: String,
    pub source: &'a SourceNode,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    /// Ray angle the node was placed at. Radial layouts only.
    pub angle: Option<f32>,
    pub children: Vec<NodeIdx>,
    pub parent: Option<NodeIdx>,
}

impl LayoutNode<'_> {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of layout nodes stored in pre-order; the root is always at index 0.
#[derive(Debug, Clone)]
pub struct LayoutTree<'a> {
    nodes: Vec<LayoutNode<'a>>,
}

impl<'a> LayoutTree<'a> {
    pub const ROOT: NodeIdx = NodeIdx(0);

    pub(crate) fn from_nodes(nodes: Vec<LayoutNode<'a>>) -> Self {
        debug_assert!(!nodes.is_empty(), "layout tree needs a root");
        Self { nodes }
    }

    pub fn root(&self) -> &LayoutNode<'a> {
        &self.nodes[0]
    }

    pub fn node(&self, idx: NodeIdx) -> &LayoutNode<'a> {
        &self.nodes[idx.0]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut LayoutNode<'a> {
        &mut self.nodes[idx.0]
    }

    pub fn nodes(&self) -> &[LayoutNode<'a>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = NodeIdx> {
        (0..self.nodes.len()).map(NodeIdx)
    }

    pub fn find(&self, id: &str) -> Option<NodeIdx> {
        self.nodes.iter().position(|node| node.id == id).map(NodeIdx)
    }

    /// `idx` followed by all of its descendants, in pre-order.
    pub fn subtree(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        out
    }

    pub fn translate_subtree(&mut self, idx: NodeIdx, dx: f32, dy: f32) {
        for member in self.subtree(idx) {
            let node = self.node_mut(member);
            node.x += dx;
            node.y += dy;
        }
    }

    /// Node indices grouped by depth, pre-order within each level.
    pub fn levels(&self) -> Vec<Vec<NodeIdx>> {
        let mut levels: Vec<Vec<NodeIdx>> = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if levels.len() <= node.depth {
                levels.resize_with(node.depth + 1, Vec::new);
            }
            levels[node.depth].push(NodeIdx(idx));
        }
        levels
    }

    /// Number of leaves under `idx`, counting `idx` itself when it is a leaf.
    pub fn leaf_count(&self, idx: NodeIdx) -> usize {
        let node = self.node(idx);
        if node.is_leaf() {
            return 1;
        }
        node.children
            .iter()
            .map(|child| self.leaf_count(*child))
            .sum()
    }

    pub fn edges(&self) -> Vec<LayoutEdge> {
        let mut edges = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        for (idx, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                let target = self.node(*child);
                edges.push(LayoutEdge {
                    id: format!("{}->{}", node.id, target.id),
                    source: NodeIdx(idx),
                    target: *child,
                    depth: target.depth,
                });
            }
        }
        edges
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: String,
    pub source: NodeIdx,
    pub target: NodeIdx,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Output of a layout computation.
///
/// Node coordinates are untranslated; renderers add `offset_x`/`offset_y`
/// at draw time.
#[derive(Debug, Clone)]
pub struct LayoutResult<'a> {
    pub paradigm: Paradigm,
    pub tree: LayoutTree<'a>,
    pub edges: Vec<LayoutEdge>,
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl<'a> LayoutResult<'a> {
    pub fn nodes(&self) -> &[LayoutNode<'a>] {
        self.tree.nodes()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&LayoutNode<'a>> {
        self.tree.find(id).map(|idx| self.tree.node(idx))
    }

    /// Rectangle of a node in post-translation space, with any manual
    /// override applied.
    pub fn node_rect(&self, idx: NodeIdx, overrides: &PositionOverrides) -> Rect {
        let node = self.tree.node(idx);
        let (x, y) = match overrides.get(&node.id) {
            Some(pos) => (pos.x, pos.y),
            None => (node.x + self.offset_x, node.y + self.offset_y),
        };
        Rect {
            x,
            y,
            width: node.width,
            height: node.height,
        }
    }
}
