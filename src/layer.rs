//! Spatial layers with O(1) point lookup
//!
//! A `Layer<T>` keeps its entries in insertion order (grid order for derived
//! layers) and indexes them by integer lattice cell. Coordinates are snapped to
//! the nearest cell of the layer's `GridFrame`, so lookups tolerate the small
//! floating-point drift between independently computed coordinates.
//!
//! Neighbour lookups (terrain derivatives) are key offsets on the same lattice.

use crate::geometry::Point;
use crate::utils::land_cover::LandCover;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Integer lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridKey {
    pub col: i64,
    pub row: i64,
}

impl GridKey {
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    pub const fn offset(self, dcol: i64, drow: i64) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

/// Mapping between coordinates and lattice cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    pub origin: Point,
    pub step: f64,
}

impl GridFrame {
    pub const fn new(origin: Point, step: f64) -> Self {
        Self { origin, step }
    }

    /// Unit lattice anchored at (0, 0)
    pub const fn unit() -> Self {
        Self::new(Point::new(0.0, 0.0), 1.0)
    }

    pub fn key(&self, point: Point) -> GridKey {
        GridKey {
            col: ((point.x - self.origin.x) / self.step).round() as i64,
            row: ((point.y - self.origin.y) / self.step).round() as i64,
        }
    }

    pub fn point(&self, key: GridKey) -> Point {
        Point::new(
            self.origin.x + key.col as f64 * self.step,
            self.origin.y + key.row as f64 * self.step,
        )
    }
}

impl Default for GridFrame {
    fn default() -> Self {
        Self::unit()
    }
}

/// Declared value domain of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LayerDomain {
    Continuous { min: f64, max: f64 },
    Categorical { labels: Vec<String> },
    Empty,
}

#[derive(Debug, Clone)]
pub struct Layer<T> {
    name: String,
    frame: GridFrame,
    entries: Vec<(Point, T)>,
    index: FxHashMap<GridKey, usize>,
}

impl<T> Layer<T> {
    pub fn new(name: impl Into<String>, frame: GridFrame) -> Self {
        Self {
            name: name.into(),
            frame,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn from_entries<I>(name: impl Into<String>, frame: GridFrame, entries: I) -> Self
    where
        I: IntoIterator<Item = (Point, T)>,
    {
        let mut layer = Self::new(name, frame);
        for (point, value) in entries {
            layer.insert(point, value);
        }
        layer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> GridFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a value. The first value written to a cell wins; later writes
    /// to the same cell are ignored and return `false`.
    pub fn insert(&mut self, point: Point, value: T) -> bool {
        let key = self.frame.key(point);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((point, value));
        true
    }

    pub fn get(&self, point: Point) -> Option<&T> {
        self.get_key(self.frame.key(point))
    }

    pub fn get_key(&self, key: GridKey) -> Option<&T> {
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index.contains_key(&self.frame.key(point))
    }

    /// Value at the cell `(dcol, drow)` away from `point`
    pub fn neighbor(&self, point: Point, dcol: i64, drow: i64) -> Option<&T> {
        self.get_key(self.frame.key(point).offset(dcol, drow))
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.entries.iter().map(|(p, v)| (*p, v))
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    /// New layer with `f` applied to every entry, order preserved
    pub fn map<U, F>(&self, name: impl Into<String>, f: F) -> Layer<U>
    where
        F: Fn(Point, &T) -> U,
    {
        Layer {
            name: name.into(),
            frame: self.frame,
            entries: self.entries.iter().map(|(p, v)| (*p, f(*p, v))).collect(),
            index: self.index.clone(),
        }
    }

    /// Append every entry of `other` (used to merge chunked results)
    pub fn extend(&mut self, other: Layer<T>) {
        for (point, value) in other.entries {
            self.insert(point, value);
        }
    }
}

impl<T: Clone> Layer<T> {
    /// Restrict the layer to the given points, in the points' order
    pub fn clip(&self, points: &[Point]) -> Self {
        Self::from_entries(
            self.name.clone(),
            self.frame,
            points
                .iter()
                .filter_map(|&p| self.get(p).map(|v| (p, v.clone()))),
        )
    }
}

impl Layer<f64> {
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn domain(&self) -> LayerDomain {
        match self.min_max() {
            Some((min, max)) => LayerDomain::Continuous { min, max },
            None => LayerDomain::Empty,
        }
    }
}

impl Layer<LandCover> {
    /// Distinct labels in first-seen order
    pub fn domain(&self) -> LayerDomain {
        if self.is_empty() {
            return LayerDomain::Empty;
        }
        let mut labels: Vec<String> = Vec::new();
        for cover in self.values() {
            let label = cover.as_str();
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        LayerDomain::Categorical { labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tolerates_float_drift() {
        let mut layer = Layer::new("elevation", GridFrame::new(Point::new(0.0, 0.0), 0.01));
        layer.insert(Point::new(0.03, 0.07), 12.5);
        // 3 * 0.01 != 0.03 exactly
        assert_eq!(layer.get(Point::new(3.0 * 0.01, 7.0 * 0.01)), Some(&12.5));
        assert_eq!(layer.get(Point::new(0.04, 0.07)), None);
    }

    #[test]
    fn test_first_write_wins() {
        let mut layer = Layer::new("x", GridFrame::unit());
        assert!(layer.insert(Point::new(1.0, 1.0), 1.0));
        assert!(!layer.insert(Point::new(1.0, 1.0), 2.0));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.get(Point::new(1.0, 1.0)), Some(&1.0));
    }

    #[test]
    fn test_neighbor_offsets() {
        let layer = Layer::from_entries(
            "z",
            GridFrame::unit(),
            vec![(Point::new(0.0, 0.0), 1.0), (Point::new(1.0, 0.0), 2.0)],
        );
        assert_eq!(layer.neighbor(Point::new(0.0, 0.0), 1, 0), Some(&2.0));
        assert_eq!(layer.neighbor(Point::new(0.0, 0.0), -1, 0), None);
    }

    #[test]
    fn test_clip_and_domain() {
        let layer = Layer::from_entries(
            "z",
            GridFrame::unit(),
            (0..5).map(|i| (Point::new(i as f64, 0.0), i as f64 * 2.0)),
        );
        let clipped = layer.clip(&[Point::new(3.0, 0.0), Point::new(1.0, 0.0), Point::new(9.0, 0.0)]);
        assert_eq!(clipped.values().copied().collect::<Vec<_>>(), vec![6.0, 2.0]);
        assert_eq!(layer.domain(), LayerDomain::Continuous { min: 0.0, max: 8.0 });
        assert_eq!(Layer::<f64>::new("e", GridFrame::unit()).domain(), LayerDomain::Empty);
    }

    #[test]
    fn test_land_cover_domain() {
        let layer = Layer::from_entries(
            "land_cover",
            GridFrame::unit(),
            vec![
                (Point::new(0.0, 0.0), LandCover::Forest),
                (Point::new(1.0, 0.0), LandCover::Water),
                (Point::new(2.0, 0.0), LandCover::Forest),
            ],
        );
        assert_eq!(
            layer.domain(),
            LayerDomain::Categorical {
                labels: vec!["forest".to_string(), "water".to_string()]
            }
        );
    }
}
