use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use evograph::config::{LayoutConfig, LayoutStrategy};
use evograph::export::svg_to_png;
use evograph::parser::{GraphFormat, parse_graph};
use evograph::{compute_layout_with, render_svg};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lay out a directed graph and draw it as SVG or PNG
#[derive(Parser, Debug)]
#[command(name = "evograph")]
#[command(version)]
#[command(
    about = "Lay out a directed graph by generational search and render it",
    long_about = None
)]
struct Args {
    /// Graph description file (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg or .png)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Layout/style config file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Input syntax; guessed from the extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<GraphFormat>,

    /// Layout strategy
    #[arg(short, long, value_enum)]
    strategy: Option<LayoutStrategy>,

    /// Canvas side length
    #[arg(long)]
    scale: Option<u32>,

    /// Number of generations to run
    #[arg(long)]
    iterations: Option<usize>,

    /// RNG seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Draw arrowheads on edges
    #[arg(long)]
    arrows: bool,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "evograph", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let (Some(input), Some(output)) = (args.input.as_ref(), args.output.as_ref()) else {
        return Err("INPUT and --output are required".to_string());
    };

    let mut config = match args.config {
        Some(ref path) => LayoutConfig::from_path(path).map_err(|e| e.to_string())?,
        None => LayoutConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    if args.arrows {
        config.style.arrows = true;
    }
    config.validate().map_err(|e| e.to_string())?;

    // Read graph description
    let from_stdin = input.to_str() == Some("-");
    let source = if from_stdin {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        buffer
    } else {
        std::fs::read_to_string(input).map_err(|e| format!("Failed to read input file: {}", e))?
    };
    let format = args.format.unwrap_or_else(|| GraphFormat::from_path(input));
    let graph = parse_graph(&source, format).map_err(|e| e.to_string())?;

    let layout =
        compute_layout_with(&graph, &config, &mut config.rng()).map_err(|e| e.to_string())?;
    info!(nodes = graph.len(), strategy = ?config.strategy, "layout computed");
    let svg =
        render_svg(&graph, &layout, config.scale, &config.style).map_err(|e| e.to_string())?;

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or("Output file has no extension")?
        .to_ascii_lowercase();

    match output_ext.as_str() {
        "svg" => {
            std::fs::write(output, &svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", output.display());
        }
        "png" => {
            let png_data = svg_to_png(&svg, args.png_scale).map_err(|e| e.to_string())?;
            std::fs::write(output, png_data).map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", output.display());
        }
        _ => {
            return Err(format!(
                "Unsupported output format: .{} (use .svg or .png)",
                output_ext
            ));
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
