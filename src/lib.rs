#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, Paradigm, load_config};
pub use ir::{SourceNode, TreeError, parse_tree};
pub use layout::{LayoutResult, PositionOverrides, compute_layout, route_edges};
pub use text_metrics::{FontMetrics, HeuristicMetrics, TextMeasure};
pub use theme::Theme;
