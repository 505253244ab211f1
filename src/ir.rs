use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    #[default]
    RoundRect,
    Rectangle,
    Pill,
    Ellipse,
    Underline,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Per-node presentation overrides. Only `font_size`, `font_weight` and
/// `icon` influence geometry; the rest is passed through to renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    pub icon: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub shape: Option<NodeShape>,
}

/// A node of the caller-owned input tree.
///
/// Ids are expected to be unique and the structure acyclic. Neither is
/// checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children: Vec<SourceNode>,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub collapsed: bool,
}

impl SourceNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            children: Vec::new(),
            style: NodeStyle::default(),
            collapsed: false,
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SourceNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Total number of nodes in this subtree, hidden ones included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SourceNode::count).sum::<usize>()
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid tree document: {0}")]
    Syntax(#[from] json5::Error),
    #[error("node at path {path} has an empty id")]
    EmptyId { path: String },
}

/// Parses a JSON or JSON5 document into a tree.
pub fn parse_tree(input: &str) -> Result<SourceNode, TreeError> {
    let root: SourceNode = json5::from_str(input)?;
    check_ids(&root, "0")?;
    Ok(root)
}

fn check_ids(node: &SourceNode, path: &str) -> Result<(), TreeError> {
    if node.id.trim().is_empty() {
        return Err(TreeError::EmptyId {
            path: path.to_string(),
        });
    }
    for (idx, child) in node.children.iter().enumerate() {
        check_ids(child, &format!("{path}.{idx}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json5_tree() {
        let input = r#"{
            id: "root", text: "Root",
            children: [
                { id: "a", text: "A", style: { icon: "star", fontSize: 18 } },
                { id: "b", text: "B", collapsed: true, children: [{ id: "c", text: "C" }] },
            ],
        }"#;
        let root = parse_tree(input).expect("parse");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].style.icon.as_deref(), Some("star"));
        assert_eq!(root.children[0].style.font_size, Some(18.0));
        assert!(root.children[1].collapsed);
        assert_eq!(root.count(), 4);
    }

    #[test]
    fn rejects_empty_ids() {
        let input = r#"{ "id": "root", "text": "R", "children": [{ "id": " ", "text": "x" }] }"#;
        let err = parse_tree(input).unwrap_err();
        assert!(matches!(err, TreeError::EmptyId { ref path } if path == "0.0"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            parse_tree("{ id: 1"),
            Err(TreeError::Syntax(_))
        ));
    }
}
