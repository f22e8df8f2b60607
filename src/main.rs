mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use img2edges::{KernelCentering, Pipeline, PipelineOptions, load_raster, save_raster};
use log::{LevelFilter, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut options = match &cli.config {
        Some(path) => PipelineOptions::from_json_file(path)?,
        None => PipelineOptions::default(),
    };
    if let Some(sigma) = cli.sigma {
        options.sigma = sigma;
    }
    if let Some(radius) = cli.radius {
        options.radius = radius;
    }
    if cli.legacy_centering {
        options.centering = KernelCentering::Shifted;
    }
    if cli.sequential {
        options.parallel = false;
    }
    info!("options: {options:?}");

    println!(
        "Processing {} to {}...",
        cli.input.display(),
        cli.output.display()
    );

    let pipeline = Pipeline::new(options).context("invalid pipeline options")?;
    let raster = load_raster(&cli.input)?;
    let edges = pipeline.run(raster)?;

    println!("Writing file...");
    save_raster(&edges, &cli.output)
        .with_context(|| format!("could not write {}", cli.output.display()))?;

    println!("Done writing");
    Ok(())
}
