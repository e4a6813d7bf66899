use crate::config::load_config;
use crate::drag::{PointerMove, on_pointer_move};
use crate::dump::write_store_dump;
use crate::render::{render_svg, write_output_svg};
use crate::scene::{Scene, parse_scene};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "anchors", version, about = "Resolve edge anchors for a node-edge scene and render it")]
pub struct Args {
    /// Scene file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, render and anchor defaults)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Minimum canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Drag a node before output, as NODE:DX,DY. Repeatable; applied in order.
    #[arg(short = 'd', long = "drag", value_parser = parse_drag)]
    pub drags: Vec<DragStep>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragStep {
    pub node_id: String,
    pub movement: PointerMove,
}

pub fn parse_drag(value: &str) -> Result<DragStep, String> {
    let (node_id, delta) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NODE:DX,DY, got {value:?}"))?;
    let (dx, dy) = delta
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY after ':', got {delta:?}"))?;
    let parse = |raw: &str| -> Result<f32, String> {
        let value = raw
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid delta {raw:?}: {err}"))?;
        if !value.is_finite() {
            return Err(format!("delta must be finite, got {raw:?}"));
        }
        Ok(value)
    };
    if node_id.is_empty() {
        return Err("missing node id".to_string());
    }
    Ok(DragStep {
        node_id: node_id.to_string(),
        movement: PointerMove::new(parse(dx)?, parse(dy)?),
    })
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let scene = read_scene(args.input.as_deref())?;
    let mut store = scene.build_store(&config.anchors)?;
    info!(
        nodes = store.node_count(),
        edges = store.edge_count(),
        "scene loaded"
    );

    for step in &args.drags {
        on_pointer_move(&mut store, &step.node_id, step.movement)
            .with_context(|| format!("dragging node {}", step.node_id))?;
    }

    match args.output_format {
        OutputFormat::Json => write_store_dump(args.output.as_deref(), &store)?,
        OutputFormat::Svg => {
            let svg = render_svg(&store, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&store, &config, args.output.as_deref())?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(store: &crate::store::GraphStore, config: &crate::config::Config, output: Option<&Path>) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    let svg = render_svg(store, &config.theme, &config.render);
    crate::render::write_output_png(&svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_store: &crate::store::GraphStore, _config: &crate::config::Config, _output: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_scene(path: Option<&Path>) -> Result<Scene> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return crate::scene::load_scene(path);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    parse_scene(&buf).context("parsing scene from stdin")
}
