use serde::{Deserialize, Serialize};

const LEVEL_COLORS: [&str; 12] = [
    "hsl(240, 100%, 76.2745098039%)",
    "hsl(60, 100%, 73.5294117647%)",
    "hsl(80, 100%, 76.2745098039%)",
    "hsl(270, 100%, 76.2745098039%)",
    "hsl(300, 100%, 76.2745098039%)",
    "hsl(330, 100%, 76.2745098039%)",
    "hsl(0, 100%, 76.2745098039%)",
    "hsl(30, 100%, 76.2745098039%)",
    "hsl(90, 100%, 76.2745098039%)",
    "hsl(150, 100%, 76.2745098039%)",
    "hsl(180, 100%, 76.2745098039%)",
    "hsl(210, 100%, 76.2745098039%)",
];

const MODERN_LEVEL_COLORS: [&str; 6] = [
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#B279A2",
];

/// Typography and colours shared by sizing and edge presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_weight: u16,
    pub root_font_size: f32,
    /// Font size per depth, starting at depth 1. Deeper levels reuse the
    /// last entry.
    pub level_font_sizes: Vec<f32>,
    pub line_color: String,
    pub level_colors: Vec<String>,
    pub background: String,
}

impl Theme {
    pub fn mermaid_default() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_weight: 400,
            root_font_size: 20.0,
            level_font_sizes: vec![16.0, 14.0, 13.0],
            line_color: "#333333".to_string(),
            level_colors: LEVEL_COLORS.iter().map(|value| value.to_string()).collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_weight: 500,
            root_font_size: 18.0,
            level_font_sizes: vec![15.0, 13.0, 12.0],
            line_color: "#7A8AA6".to_string(),
            level_colors: MODERN_LEVEL_COLORS
                .iter()
                .map(|value| value.to_string())
                .collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Font size for a node at `depth`, before any per-node override.
    pub fn font_size_for_depth(&self, depth: usize) -> f32 {
        if depth == 0 {
            return self.root_font_size;
        }
        match self.level_font_sizes.len() {
            0 => self.root_font_size,
            len => self.level_font_sizes[(depth - 1).min(len - 1)],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mermaid_default()
    }
}
