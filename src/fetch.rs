//! Batched acquisition of point layers from an external source
//!
//! Points are fetched in batches of `batch_size`, each batch running on a pool
//! of at most `max_concurrency` threads. Between batches the fetcher sleeps for
//! `pacing_ms` (rate limiting) and checks for cancellation.
//!
//! A failed point is logged and left out; it never aborts its batch. Only whole
//! batches are merged into the resulting store, so a cancelled fetch returns a
//! consistent partial store.
//!
//! A sample may also carry a weather observation; those are collected into a
//! separate layer for the weather potentials.

use crate::data::{LayerName, LayerStore};
use crate::error::{Result, SitingError};
use crate::geometry::Point;
use crate::layer::{GridFrame, Layer};
use crate::potentials::weather::WeatherSample;
use crate::progress::{CancellationToken, ProgressCallback, ProgressTracker};
use crate::utils::land_cover::LandCover;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Layer values returned for one point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSample {
    pub values: Vec<(LayerName, f64)>,
    pub land_cover: Option<LandCover>,
    pub weather: Option<WeatherSample>,
}

impl PointSample {
    pub fn with_value(mut self, name: LayerName, value: f64) -> Self {
        self.values.push((name, value));
        self
    }

    pub fn with_land_cover(mut self, cover: LandCover) -> Self {
        self.land_cover = Some(cover);
        self
    }

    pub fn with_weather(mut self, weather: WeatherSample) -> Self {
        self.weather = Some(weather);
        self
    }
}

/// External provider of per-point layer values
pub trait PointSource: Sync {
    fn fetch(&self, point: Point) -> Result<PointSample>;
}

impl<F> PointSource for F
where
    F: Fn(Point) -> Result<PointSample> + Sync,
{
    fn fetch(&self, point: Point) -> Result<PointSample> {
        self(point)
    }
}

/// Serves samples out of an already loaded store
///
/// A point with no value in any layer fails like an unreachable service would.
pub struct StoreSource<'a> {
    store: &'a LayerStore,
}

impl<'a> StoreSource<'a> {
    pub fn new(store: &'a LayerStore) -> Self {
        Self { store }
    }
}

impl PointSource for StoreSource<'_> {
    fn fetch(&self, point: Point) -> Result<PointSample> {
        let mut sample = PointSample::default();
        for name in self.store.layer_names() {
            if let Some(value) = self.store.value(name, point) {
                sample = sample.with_value(name, value);
            }
        }
        if let Some(cover) = self.store.land_cover_at(point) {
            sample = sample.with_land_cover(cover);
        }

        if sample.values.is_empty() && sample.land_cover.is_none() {
            return Err(SitingError::Fetch {
                x: point.x,
                y: point.y,
                reason: "no layer covers this point".to_string(),
            });
        }
        Ok(sample)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    pub batch_size: usize,
    pub max_concurrency: usize,
    pub pacing_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_concurrency: 10,
            pacing_ms: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub store: LayerStore,
    /// Weather observations of the fetched points that carried one
    pub weather: Layer<WeatherSample>,
    /// Points whose samples were merged
    pub fetched: usize,
    /// Points whose fetch failed, in request order
    pub failed: Vec<Point>,
    /// True when the fetch stopped early on cancellation
    pub cancelled: bool,
}

pub struct BatchFetcher {
    config: FetchConfig,
    pool: rayon::ThreadPool,
}

impl BatchFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(SitingError::InvalidConfig("fetch batch size must be positive".to_string()));
        }
        let threads = config.max_concurrency.clamp(1, config.batch_size);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("layer-fetch-{}", i))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch every point's layers into a new store keyed by `frame`
    pub fn fetch_layers<S>(
        &self,
        source: &S,
        points: &[Point],
        frame: GridFrame,
        progress: Option<&ProgressCallback>,
        cancel: &CancellationToken,
    ) -> FetchOutcome
    where
        S: PointSource + ?Sized,
    {
        let start = Instant::now();
        let tracker = ProgressTracker::new(points.len(), progress);
        let pacing = Duration::from_millis(self.config.pacing_ms);
        let batch_count = points.len().div_ceil(self.config.batch_size);

        let mut outcome = FetchOutcome {
            store: LayerStore::new(frame),
            weather: Layer::new("weather", frame),
            fetched: 0,
            failed: Vec::new(),
            cancelled: false,
        };

        for (batch_index, batch) in points.chunks(self.config.batch_size).enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(batch = batch_index, batches = batch_count, "Layer fetch cancelled");
                outcome.cancelled = true;
                break;
            }

            let results: Vec<(Point, Result<PointSample>)> = self
                .pool
                .install(|| batch.par_iter().map(|&p| (p, source.fetch(p))).collect());

            // Merge the whole batch at once
            for (point, result) in results {
                match result {
                    Ok(sample) => {
                        for (name, value) in sample.values {
                            outcome.store.insert_value(name, point, value);
                        }
                        if let Some(cover) = sample.land_cover {
                            outcome.store.insert_land_cover(point, cover);
                        }
                        if let Some(weather) = sample.weather {
                            outcome.weather.insert(point, weather);
                        }
                        outcome.fetched += 1;
                    }
                    Err(err) => {
                        tracing::warn!(x = point.x, y = point.y, "Skipping point: {err}");
                        outcome.failed.push(point);
                    }
                }
            }
            tracker.advance(batch.len());

            let is_last = batch_index + 1 == batch_count;
            if !is_last && !pacing.is_zero() {
                std::thread::sleep(pacing);
            }
        }

        tracing::info!(
            requested = points.len(),
            fetched = outcome.fetched,
            failed = outcome.failed.len(),
            cancelled = outcome.cancelled,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Layer fetch finished"
        );

        outcome
    }
}
