//! Site analysis driver
//!
//! Runs one energy type over a polygon and prints the Markdown summary;
//! GeoJSON and CSV exports are written to OUTPUT_DIR.
//!
//! Environment:
//! - LAYER_FILE: CSV or Parquet layer table (synthetic layers when unset)
//! - ENERGY_TYPE: solar | wind | tidal | hydro (default solar)
//! - POLYGON: "x,y;x,y;..." (default: the synthetic area inset by 2 cells)
//! - CONFIG_FILE: JSON AnalysisConfig
//! - OUTPUT_DIR: export directory (default site_analysis_output)
//! - GRID_SIZE: synthetic grid side (default 50)
//! - SEED: synthetic seed (default 42)
//! - FETCH_LAYERS: when set, re-acquire the polygon's layers point by point
//!   through the batch fetcher (batching and pacing from the config's `fetch`)

use anyhow::{bail, Context};
use site_scorer_rust::{
    synthetic_store, AnalysisConfig, AnalysisRequest, BatchFetcher, CancellationToken,
    CsvFormatter, EnergyType, GeoJsonFormatter, GridFrame, GridSpec, LayerStore,
    MarkdownFormatter, Point, Polygon, Progress, ProgressCallback, SiteScorer, StoreSource,
    SYNTHETIC_CELL_SIZE,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_scorer_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let energy_type: EnergyType = std::env::var("ENERGY_TYPE")
        .unwrap_or_else(|_| "solar".to_string())
        .parse()?;
    let output_dir = PathBuf::from(
        std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "site_analysis_output".to_string()),
    );
    let grid_size: usize = env_or("GRID_SIZE", 50)?;
    let seed: u64 = env_or("SEED", 42)?;

    let mut config = match std::env::var("CONFIG_FILE") {
        Ok(path) => AnalysisConfig::load(&path)?,
        Err(_) => AnalysisConfig::default(),
    };

    let load_start = Instant::now();
    let store = match std::env::var("LAYER_FILE") {
        Ok(path) => {
            tracing::info!("Loading layers from {}", path);
            LayerStore::load(&path, GridFrame::new(Point::new(0.0, 0.0), config.grid_step))?
        }
        Err(_) => {
            tracing::info!(grid_size, seed, "Generating synthetic layers");
            config.cell_size = SYNTHETIC_CELL_SIZE;
            config.grid_step = 1.0;
            synthetic_store(grid_size, grid_size, seed)
        }
    };
    tracing::info!(elapsed_ms = load_start.elapsed().as_millis() as u64, "Layers ready");

    let polygon = match std::env::var("POLYGON") {
        Ok(spec) => parse_polygon(&spec)?,
        Err(_) => default_polygon(grid_size),
    };

    let store = if std::env::var("FETCH_LAYERS").is_ok() {
        fetch_store(&store, &polygon, &config)?
    } else {
        store
    };

    let scorer = SiteScorer::new(config)?;
    let outcome = scorer.analyze(&store, &AnalysisRequest::new(polygon, energy_type))?;

    println!("{}", MarkdownFormatter::format(&outcome.report, &outcome.candidates));

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let geojson_path = output_dir.join(format!("{}_candidates.geojson", energy_type));
    fs::write(
        &geojson_path,
        GeoJsonFormatter::format(&outcome.candidates, energy_type)?,
    )
    .with_context(|| format!("Failed to write {}", geojson_path.display()))?;

    let csv_path = output_dir.join(format!("{}_candidates.csv", energy_type));
    fs::write(&csv_path, CsvFormatter::format(&outcome.candidates, energy_type))
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    tracing::info!("Exports written to {}", output_dir.display());
    Ok(())
}

/// Acquire the polygon's layers (plus one cell of margin for terrain) through
/// the batch fetcher
fn fetch_store(
    source: &LayerStore,
    polygon: &Polygon,
    config: &AnalysisConfig,
) -> anyhow::Result<LayerStore> {
    let bounds = polygon
        .bounding_box()
        .context("Polygon has no bounding box")?;
    let step = config.grid_step;
    let margin = Polygon::from_coords(&[
        (bounds.min_x - step, bounds.min_y - step),
        (bounds.max_x + step, bounds.min_y - step),
        (bounds.max_x + step, bounds.max_y + step),
        (bounds.min_x - step, bounds.max_y + step),
    ]);
    let lattice = GridSpec::new(margin, step)?.points();

    let fetcher = BatchFetcher::new(config.fetch.clone())?;
    tracing::info!(
        points = lattice.len(),
        batch_size = fetcher.config().batch_size,
        "Fetching layers"
    );
    let progress: ProgressCallback = Box::new(|p: Progress| {
        tracing::debug!(processed = p.processed, total = p.total, "Fetch progress");
    });
    let outcome = fetcher.fetch_layers(
        &StoreSource::new(source),
        &lattice,
        source.frame(),
        Some(&progress),
        &CancellationToken::new(),
    );
    if outcome.fetched == 0 {
        bail!("No layer values could be fetched for the polygon");
    }
    tracing::info!(
        fetched = outcome.fetched,
        failed = outcome.failed.len(),
        "Layers fetched"
    );
    Ok(outcome.store)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Parse "x,y;x,y;..." into a polygon
fn parse_polygon(spec: &str) -> anyhow::Result<Polygon> {
    let mut vertices = Vec::new();
    for pair in spec.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((x, y)) = pair.split_once(',') else {
            bail!("Invalid polygon vertex: {}", pair);
        };
        let x: f64 = x.trim().parse().with_context(|| format!("Invalid x in {}", pair))?;
        let y: f64 = y.trim().parse().with_context(|| format!("Invalid y in {}", pair))?;
        vertices.push(Point::new(x, y));
    }
    Ok(Polygon::try_new(vertices)?)
}

fn default_polygon(grid_size: usize) -> Polygon {
    let max = grid_size.saturating_sub(3).max(3) as f64;
    Polygon::from_coords(&[(2.0, 2.0), (max, 2.0), (max, max), (2.0, max)])
}
