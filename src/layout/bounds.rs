use super::{Bounds, LayoutTree};

/// Translation and canvas size that bring every node into non-negative
/// coordinates with `padding` on all sides.
pub fn compute_bounds(tree: &LayoutTree<'_>, padding: f32) -> Bounds {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in tree.nodes() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    if min_x == f32::MAX {
        return Bounds {
            offset_x: padding,
            offset_y: padding,
            width: padding * 2.0,
            height: padding * 2.0,
        };
    }
    Bounds {
        offset_x: -min_x + padding,
        offset_y: -min_y + padding,
        width: (max_x - min_x) + padding * 2.0,
        height: (max_y - min_y) + padding * 2.0,
    }
}
