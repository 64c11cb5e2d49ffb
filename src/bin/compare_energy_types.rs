//! Compare all four energy types over the same area
//!
//! Uses synthetic layers (GRID_SIZE, SEED) unless LAYER_FILE is set, and the
//! default weights and constraints of each energy type. Besides the per-type
//! reports it prints the per-point classification (multi-source sites) and
//! classifies WEATHER_POINTS strategic points (default 10) from synthetic
//! weather observations fetched through the batch fetcher.

use site_scorer_rust::classification::classify_weather;
use site_scorer_rust::{
    generate_grid, select_strategic_points, synthetic_store, AnalysisConfig, BatchFetcher,
    CancellationToken, GridFrame, LayerStore, Point, PointClassification, Polygon, SiteScorer,
    SyntheticWeather, SYNTHETIC_CELL_SIZE,
};
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

    let grid_size: usize = env_or("GRID_SIZE", 40)?;
    let seed: u64 = env_or("SEED", 42)?;
    let weather_points: usize = env_or("WEATHER_POINTS", 10)?;

    let mut config = match std::env::var("CONFIG_FILE") {
        Ok(path) => AnalysisConfig::load(&path)?,
        Err(_) => AnalysisConfig::default(),
    };

    let store = match std::env::var("LAYER_FILE") {
        Ok(path) => LayerStore::load(&path, GridFrame::new(Point::new(0.0, 0.0), config.grid_step))?,
        Err(_) => {
            config.cell_size = SYNTHETIC_CELL_SIZE;
            config.grid_step = 1.0;
            synthetic_store(grid_size, grid_size, seed)
        }
    };

    let max = grid_size.saturating_sub(3).max(3) as f64;
    let polygon = Polygon::from_coords(&[(2.0, 2.0), (max, 2.0), (max, max), (2.0, max)]);

    let thresholds = config.thresholds;
    let fetch_config = config.fetch.clone();
    let scorer = SiteScorer::new(config)?;
    let start = Instant::now();
    let comparison = scorer.compare_energy_types(&store, &polygon)?;

    println!("\n{}", "=".repeat(70));
    println!("ENERGY TYPE COMPARISON ({}x{} grid, seed {})", grid_size, grid_size, seed);
    println!("{}", "=".repeat(70));
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10}  {}",
        "Type", "Scored", "Sites", "Mean", "Max", "Band"
    );
    println!("{}", "-".repeat(70));
    for report in &comparison.reports {
        println!(
            "{:<8} {:>10} {:>10} {:>10.3} {:>10.3}  {}",
            report.energy_type.as_str(),
            report.scored_point_count,
            report.candidate_count,
            report.average_suitability,
            report.max_suitability,
            report.band.label()
        );
    }
    println!("{}", "-".repeat(70));

    match comparison.best {
        Some(best) => println!("Best energy type: {}", best),
        None => println!("No energy type produced suitable locations"),
    }

    println!("\nPER-POINT CLASSIFICATION ({} points)", comparison.points.len());
    for (class, count) in comparison.class_counts() {
        println!("  {:<8} {:>8}", class.as_str(), count);
    }
    let multi: Vec<&PointClassification> = comparison.multi_source_points().collect();
    if !multi.is_empty() {
        println!("\nMulti-source sites (first 10 of {}):", multi.len());
        print_classifications(multi.into_iter().take(10));
    }

    let candidates = select_strategic_points(&generate_grid(&polygon, 1.0)?, weather_points);
    let fetcher = BatchFetcher::new(fetch_config)?;
    let outcome = fetcher.fetch_layers(
        &SyntheticWeather::new(seed),
        &candidates,
        GridFrame::unit(),
        None,
        &CancellationToken::new(),
    );
    let weather = classify_weather(&outcome.weather, &thresholds);
    println!(
        "\nWEATHER CLASSIFICATION ({} of {} points observed)",
        weather.len(),
        candidates.len()
    );
    print_classifications(weather.iter());

    println!("\nTotal time: {:.2?}", start.elapsed());

    Ok(())
}

fn print_classifications<'a>(points: impl Iterator<Item = &'a PointClassification>) {
    println!(
        "  {:>8} {:>8}  {:<6} {:>6}  {}",
        "x", "y", "Best", "Score", "Suitable"
    );
    for c in points {
        let suitable: Vec<&str> = c.suitable.iter().map(|t| t.as_str()).collect();
        println!(
            "  {:>8.1} {:>8.1}  {:<6} {:>6.3}  {}",
            c.point.x,
            c.point.y,
            c.best.map_or("-", |t| t.as_str()),
            c.best_score,
            if suitable.is_empty() {
                "-".to_string()
            } else {
                suitable.join(", ")
            }
        );
    }
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
