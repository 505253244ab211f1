use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overall arrangement strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Paradigm {
    #[default]
    Radial,
    HorizontalRight,
    HorizontalLeft,
    Vertical,
    Balanced,
}

impl Paradigm {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "radial" => Some(Self::Radial),
            "horizontal-right" | "right" | "lr" => Some(Self::HorizontalRight),
            "horizontal-left" | "left" | "rl" => Some(Self::HorizontalLeft),
            "vertical" | "td" | "tb" => Some(Self::Vertical),
            "balanced" | "tree" => Some(Self::Balanced),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::HorizontalRight => "horizontal-right",
            Self::HorizontalLeft => "horizontal-left",
            Self::Vertical => "vertical",
            Self::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurveStyle {
    #[default]
    Bezier,
    Organic,
    Straight,
    Angular,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8 4"),
            Self::Dotted => Some("3 3"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    #[default]
    None,
    Arrow,
    OpenArrow,
    Dot,
}

impl MarkerKind {
    pub fn is_arrow(self) -> bool {
        matches!(self, Self::Arrow | Self::OpenArrow)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialConfig {
    /// Added to the horizontal spacing to form the base ring step.
    pub ring_margin: f32,
    /// Extra radius per ring beyond the first.
    pub depth_extra: f32,
    /// Margin added to a node's diagonal when computing its sector floor.
    pub node_margin: f32,
    /// Minimum sector a node may be allocated, in radians.
    pub min_sector: f32,
    pub collision_passes: usize,
    /// Angle at which the first child sector of the root starts.
    pub start_angle: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            ring_margin: 80.0,
            depth_extra: 40.0,
            node_margin: 20.0,
            min_sector: 0.3,
            collision_passes: 4,
            start_angle: -std::f32::consts::FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub curve: CurveStyle,
    pub thickness: f32,
    pub taper: bool,
    /// Flat colour; falls back to the theme line colour when unset.
    pub color: Option<String>,
    pub color_by_level: bool,
    /// Level palette; falls back to the theme level colours when empty.
    pub palette: Vec<String>,
    pub stroke_style: StrokeStyle,
    pub start_marker: MarkerKind,
    pub end_marker: MarkerKind,
    pub marker_size: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            curve: CurveStyle::Bezier,
            thickness: 3.0,
            taper: true,
            color: None,
            color_by_level: false,
            palette: Vec::new(),
            stroke_style: StrokeStyle::Solid,
            start_marker: MarkerKind::None,
            end_marker: MarkerKind::None,
            marker_size: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub padding: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { padding: 40.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub paradigm: Paradigm,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    /// Constant added to the spacing for every depth step of the tidy
    /// layouts.
    pub level_margin: f32,
    /// Nodes at this depth are laid out without children. `None` lays out
    /// the whole tree.
    pub max_depth: Option<usize>,
    pub collision_padding: f32,
    pub node_padding_x: f32,
    pub node_padding_y: f32,
    pub radial: RadialConfig,
    pub edges: EdgeConfig,
    pub export: ExportConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paradigm: Paradigm::Radial,
            horizontal_spacing: 60.0,
            vertical_spacing: 20.0,
            level_margin: 80.0,
            max_depth: None,
            collision_padding: 10.0,
            node_padding_x: 16.0,
            node_padding_y: 8.0,
            radial: RadialConfig::default(),
            edges: EdgeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn with_paradigm(mut self, paradigm: Paradigm) -> Self {
        self.paradigm = paradigm;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    typography: Option<TypographyFile>,
    layout: Option<LayoutFile>,
    radial: Option<RadialFile>,
    edges: Option<EdgesFile>,
    export: Option<ExportFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TypographyFile {
    font_family: Option<String>,
    font_weight: Option<u16>,
    root_font_size: Option<f32>,
    level_font_sizes: Option<Vec<f32>>,
    line_color: Option<String>,
    level_colors: Option<Vec<String>>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    paradigm: Option<String>,
    horizontal_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    level_margin: Option<f32>,
    max_depth: Option<usize>,
    collision_padding: Option<f32>,
    node_padding_x: Option<f32>,
    node_padding_y: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RadialFile {
    ring_margin: Option<f32>,
    depth_extra: Option<f32>,
    node_margin: Option<f32>,
    min_sector: Option<f32>,
    collision_passes: Option<usize>,
    start_angle: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct EdgesFile {
    curve: Option<CurveStyle>,
    thickness: Option<f32>,
    taper: Option<bool>,
    color: Option<String>,
    color_by_level: Option<bool>,
    palette: Option<Vec<String>>,
    stroke_style: Option<StrokeStyle>,
    start_marker: Option<MarkerKind>,
    end_marker: Option<MarkerKind>,
    marker_size: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ExportFile {
    padding: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "base" | "default" | "mermaid" => config.theme = Theme::mermaid_default(),
            other => anyhow::bail!("unknown theme '{other}'"),
        }
    }

    if let Some(typo) = parsed.typography {
        if let Some(v) = typo.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = typo.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = typo.root_font_size {
            config.theme.root_font_size = v;
        }
        if let Some(v) = typo.level_font_sizes {
            config.theme.level_font_sizes = v;
        }
        if let Some(v) = typo.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = typo.level_colors {
            config.theme.level_colors = v;
        }
        if let Some(v) = typo.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(token) = layout.paradigm {
            config.layout.paradigm = Paradigm::from_token(&token)
                .ok_or_else(|| anyhow::anyhow!("unknown layout paradigm '{token}'"))?;
        }
        if let Some(v) = layout.horizontal_spacing {
            config.layout.horizontal_spacing = v;
        }
        if let Some(v) = layout.vertical_spacing {
            config.layout.vertical_spacing = v;
        }
        if let Some(v) = layout.level_margin {
            config.layout.level_margin = v;
        }
        if let Some(v) = layout.max_depth {
            config.layout.max_depth = Some(v);
        }
        if let Some(v) = layout.collision_padding {
            config.layout.collision_padding = v;
        }
        if let Some(v) = layout.node_padding_x {
            config.layout.node_padding_x = v;
        }
        if let Some(v) = layout.node_padding_y {
            config.layout.node_padding_y = v;
        }
    }

    if let Some(radial) = parsed.radial {
        let target = &mut config.layout.radial;
        if let Some(v) = radial.ring_margin {
            target.ring_margin = v;
        }
        if let Some(v) = radial.depth_extra {
            target.depth_extra = v;
        }
        if let Some(v) = radial.node_margin {
            target.node_margin = v;
        }
        if let Some(v) = radial.min_sector {
            target.min_sector = v;
        }
        if let Some(v) = radial.collision_passes {
            target.collision_passes = v;
        }
        if let Some(v) = radial.start_angle {
            target.start_angle = v;
        }
    }

    if let Some(edges) = parsed.edges {
        let target = &mut config.layout.edges;
        if let Some(v) = edges.curve {
            target.curve = v;
        }
        if let Some(v) = edges.thickness {
            target.thickness = v;
        }
        if let Some(v) = edges.taper {
            target.taper = v;
        }
        if let Some(v) = edges.color {
            target.color = Some(v);
        }
        if let Some(v) = edges.color_by_level {
            target.color_by_level = v;
        }
        if let Some(v) = edges.palette {
            target.palette = v;
        }
        if let Some(v) = edges.stroke_style {
            target.stroke_style = v;
        }
        if let Some(v) = edges.start_marker {
            target.start_marker = v;
        }
        if let Some(v) = edges.end_marker {
            target.end_marker = v;
        }
        if let Some(v) = edges.marker_size {
            target.marker_size = v;
        }
    }

    if let Some(export) = parsed.export
        && let Some(v) = export.padding
    {
        config.layout.export.padding = v;
    }

    Ok(config)
}
