/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use anyhow::{Context, Result};
use clap::Parser;
use nogo_hotspots::configs::get_configs;
use nogo_hotspots::pipeline::{NoGoHotspots, ParameterSet};
use nogo_hotspots::units::LinearDistance;
use nogo_hotspots::utils::get_formatted_elapsed_time;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nogo_hotspots")]
#[command(
    author,
    version,
    about = "Identifies clusters of no-go polygons lying outside protected areas",
    long_about = None
)]
struct Cli {
    /// Settings file (defaults to settings.json in the working directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the input shapefiles
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving the output shapefiles and CSV table
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory for intermediate layers (used with --keep-intermediate)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Protected-area shapefile name, relative to the input directory
    #[arg(long)]
    protected_areas: Option<String>,

    /// No-go shapefile name, relative to the input directory
    #[arg(long)]
    nogo: Option<String>,

    /// Protected-area buffer distance, e.g. "250 Meters"
    #[arg(long)]
    buffer: Option<LinearDistance>,

    /// Clustering search distance, e.g. "10 Kilometers"
    #[arg(long)]
    search: Option<LinearDistance>,

    /// Minimum number of features in a cluster
    #[arg(long)]
    min_feats: Option<usize>,

    /// Field by which no-go polygons are dissolved
    #[arg(long)]
    dissolve_field: Option<String>,

    /// Write every intermediate layer to the workspace directory
    #[arg(long)]
    keep_intermediate: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut configs = get_configs(cli.config.as_deref()).context("failed to load settings")?;

    let verbose = cli.verbose || configs.verbose_mode;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(dir) = cli.input_dir {
        configs.input_directory = dir;
    }
    if let Some(dir) = cli.output_dir {
        configs.output_directory = dir;
    }
    if let Some(dir) = cli.workspace {
        configs.workspace_directory = dir;
    }
    if let Some(file) = cli.protected_areas {
        configs.protected_areas_file = file;
    }
    if let Some(file) = cli.nogo {
        configs.nogo_file = file;
    }
    if let Some(field) = cli.dissolve_field {
        configs.dissolve_field = field;
    }
    configs.keep_intermediate |= cli.keep_intermediate;
    configs.verbose_mode = verbose;

    // any parameter given on the command line replaces the configured sets
    if cli.buffer.is_some() || cli.search.is_some() || cli.min_feats.is_some() {
        let base = configs.parameter_sets.first().cloned().unwrap_or_default();
        configs.parameter_sets = vec![ParameterSet {
            buffer_distance: cli.buffer.unwrap_or(base.buffer_distance),
            search_distance: cli.search.unwrap_or(base.search_distance),
            min_features: cli.min_feats.unwrap_or(base.min_features),
        }];
    }

    let start = Instant::now();
    let parameter_sets = configs.parameter_sets.clone();
    let runner = NoGoHotspots::new(configs);
    for (i, params) in parameter_sets.iter().enumerate() {
        info!("parameter set {} of {}", i + 1, parameter_sets.len());
        let summary = runner.run(params).with_context(|| {
            format!(
                "run failed (buffer {}, search {}, min features {})",
                params.buffer_distance, params.search_distance, params.min_features
            )
        })?;
        info!("clustered points: {}", summary.clustered_points_file.display());
        info!("clustered polygons: {}", summary.clustered_polygons_file.display());
        info!("attribute table: {}", summary.table_file.display());
    }
    info!("Total elapsed time: {}", get_formatted_elapsed_time(start));
    Ok(())
}
