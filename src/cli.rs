use crate::config::{Paradigm, load_config};
use crate::ir::parse_tree;
use crate::layout::{PositionOverrides, compute_layout, route_edges};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::text_metrics::{FontMetrics, HeuristicMetrics, TextMeasure};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmlayout", version, about = "Mind map tree layout and edge routing")]
pub struct Args {
    /// Input tree (.json5/.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output JSON file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout paradigm, overriding the config file
    #[arg(short = 'p', long = "paradigm", value_enum)]
    pub paradigm: Option<ParadigmArg>,

    /// Measure text with the built-in width table instead of system fonts
    #[arg(long = "fast-text")]
    pub fast_text: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ParadigmArg {
    Radial,
    HorizontalRight,
    HorizontalLeft,
    Vertical,
    Balanced,
}

impl From<ParadigmArg> for Paradigm {
    fn from(arg: ParadigmArg) -> Self {
        match arg {
            ParadigmArg::Radial => Paradigm::Radial,
            ParadigmArg::HorizontalRight => Paradigm::HorizontalRight,
            ParadigmArg::HorizontalLeft => Paradigm::HorizontalLeft,
            ParadigmArg::Vertical => Paradigm::Vertical,
            ParadigmArg::Balanced => Paradigm::Balanced,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(paradigm) = args.paradigm {
        config.layout.paradigm = paradigm.into();
    }

    let input = read_input(args.input.as_deref())?;
    let tree = parse_tree(&input).context("failed to parse input tree")?;

    let fonts;
    let measurer: &dyn TextMeasure = if args.fast_text {
        &HeuristicMetrics
    } else {
        fonts = FontMetrics::new();
        &fonts
    };

    let result = compute_layout(&tree, &config.theme, &config.layout, measurer);
    let overrides = PositionOverrides::new();
    let edges = route_edges(&result, &config.theme, &config.layout, &overrides);
    let dump = LayoutDump::from_layout(&result, &edges, &overrides);
    write_layout_dump(args.output.as_deref(), &dump)
}

/// Logs go to stderr so they never mix with JSON on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when run() is embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paradigm_flag() {
        let args = Args::try_parse_from([
            "mmlayout",
            "-i",
            "tree.json5",
            "--paradigm",
            "horizontal-left",
            "--fast-text",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json5")));
        assert!(args.fast_text);
        assert_eq!(
            Paradigm::from(args.paradigm.unwrap()),
            Paradigm::HorizontalLeft
        );
    }

    #[test]
    fn paradigm_flag_is_optional() {
        let args = Args::try_parse_from(["mmlayout"]).unwrap();
        assert!(args.paradigm.is_none());
        assert!(args.output.is_none());
        assert!(!args.fast_text);
    }
}
