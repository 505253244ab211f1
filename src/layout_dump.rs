use crate::ir::{FontStyle, NodeShape};
use crate::layout::{LayoutResult, PositionOverrides, RoutedEdge};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub paradigm: String,
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

/// Node geometry in post-translation space.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub text: String,
    pub depth: usize,
    pub shape: NodeShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub depth: usize,
    pub path: String,
    pub stroke_width: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(
        result: &LayoutResult<'_>,
        edges: &[RoutedEdge],
        overrides: &PositionOverrides,
    ) -> Self {
        let tree = &result.tree;
        let nodes = tree
            .indices()
            .map(|idx| {
                let node = tree.node(idx);
                let rect = result.node_rect(idx, overrides);
                NodeDump {
                    id: node.id.clone(),
                    text: node.source.text.clone(),
                    depth: node.depth,
                    shape: node.source.style.shape.unwrap_or_default(),
                    color: node.source.style.color.clone(),
                    font_style: node.source.style.font_style,
                    icon: node.source.style.icon.clone(),
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    angle: node.angle,
                    parent: node.parent.map(|p| tree.node(p).id.clone()),
                }
            })
            .collect();

        let edges = result
            .edges
            .iter()
            .zip(edges)
            .map(|(edge, routed)| EdgeDump {
                id: routed.id.clone(),
                source: tree.node(edge.source).id.clone(),
                target: tree.node(edge.target).id.clone(),
                depth: routed.depth,
                path: routed.path.clone(),
                stroke_width: routed.stroke_width,
                color: routed.color.clone(),
                dash_array: routed.dash.map(str::to_string),
            })
            .collect();

        LayoutDump {
            paradigm: result.paradigm.as_str().to_string(),
            width: result.width,
            height: result.height,
            offset_x: result.offset_x,
            offset_y: result.offset_y,
            nodes,
            edges,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or to stdout when absent.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, Paradigm};
    use crate::ir::SourceNode;
    use crate::layout::{compute_layout, route_edges};
    use crate::text_metrics::HeuristicMetrics;
    use crate::theme::Theme;

    #[test]
    fn dump_uses_translated_coordinates_and_camel_case() {
        let source = SourceNode::new("root", "Root").with_children([SourceNode::new("a", "A")]);
        let theme = Theme::mermaid_default();
        let config = LayoutConfig::default().with_paradigm(Paradigm::Vertical);
        let result = compute_layout(&source, &theme, &config, &HeuristicMetrics);
        let overrides = PositionOverrides::new();
        let edges = route_edges(&result, &theme, &config, &overrides);
        let dump = LayoutDump::from_layout(&result, &edges, &overrides);

        assert_eq!(dump.paradigm, "vertical");
        assert_eq!(dump.nodes[0].x, result.tree.root().x + result.offset_x);
        assert_eq!(dump.nodes[1].parent.as_deref(), Some("root"));
        assert_eq!(dump.edges[0].source, "root");
        assert_eq!(dump.edges[0].target, "a");

        let json = serde_json::to_value(&dump).unwrap();
        assert!(json.get("offsetX").is_some());
        assert!(json["edges"][0].get("strokeWidth").is_some());
        assert!(json["edges"][0].get("dashArray").is_none());
        assert!(json["nodes"][0].get("angle").is_none());
        assert_eq!(json["nodes"][0]["shape"], "round-rect");
        assert!(json["nodes"][0].get("color").is_none());
    }
}
