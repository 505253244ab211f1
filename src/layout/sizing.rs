use crate::config::LayoutConfig;
use crate::ir::SourceNode;
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;

use super::LayoutTree;

/// Width reserved in front of the label when a node carries an icon.
pub const ICON_RESERVE: f32 = 24.0;

/// Derives node rectangles from labels and typography.
pub struct NodeSizer<'m> {
    measurer: &'m dyn TextMeasure,
    theme: &'m Theme,
    padding_x: f32,
    padding_y: f32,
}

impl<'m> NodeSizer<'m> {
    pub fn new(measurer: &'m dyn TextMeasure, theme: &'m Theme, config: &LayoutConfig) -> Self {
        Self {
            measurer,
            theme,
            padding_x: config.node_padding_x,
            padding_y: config.node_padding_y,
        }
    }

    pub fn font_size(&self, node: &SourceNode, depth: usize) -> f32 {
        node.style
            .font_size
            .unwrap_or_else(|| self.theme.font_size_for_depth(depth))
    }

    pub fn font_weight(&self, node: &SourceNode) -> u16 {
        node.style.font_weight.unwrap_or(self.theme.font_weight)
    }

    pub fn size(&self, node: &SourceNode, depth: usize) -> (f32, f32) {
        let measured = self.measurer.measure(
            &node.text,
            self.font_size(node, depth),
            &self.theme.font_family,
            self.font_weight(node),
        );
        let icon = if node.style.icon.is_some() {
            ICON_RESERVE
        } else {
            0.0
        };
        (
            measured.width + self.padding_x * 2.0 + icon,
            measured.height + self.padding_y * 2.0,
        )
    }
}

pub fn apply_sizes<'a>(mut tree: LayoutTree<'a>, sizer: &NodeSizer<'_>) -> LayoutTree<'a> {
    for idx in tree.indices().collect::<Vec<_>>() {
        let node = tree.node(idx);
        let (width, height) = sizer.size(node.source, node.depth);
        let node = tree.node_mut(idx);
        node.width = width.max(0.0);
        node.height = height.max(0.0);
    }
    tree
}
