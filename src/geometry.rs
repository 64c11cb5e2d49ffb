//! Planar geometry: points, polygons and analysis grids
//!
//! Coordinates are treated as planar (projected or degree units alike).
//! Polygons are implicitly closed; the last vertex connects back to the first.
//!
//! **Grid layout**: points are emitted row-major with the outer loop over x and
//! the inner loop over y. Coordinates are computed as `min + i * step` from an
//! integer index so the lattice is identical on every run.

use crate::error::{Result, SitingError};
use crate::layer::GridFrame;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Tolerance absorbing floating-point drift in `(max - min) / step`
const LATTICE_EPSILON: f64 = 1e-9;

/// Upper bound on lattice positions scanned for one grid
pub const MAX_GRID_POINTS: usize = 4_000_000;

/// Region lattice used by strategic sampling (3 x 3)
const SAMPLING_REGIONS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds of a point set, `None` when empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Closed polygon given as an ordered vertex ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon without validating the vertex count
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Build a polygon, rejecting rings with fewer than 3 vertices
    pub fn try_new(vertices: Vec<Point>) -> Result<Self> {
        let polygon = Self::new(vertices);
        polygon.validate()?;
        Ok(polygon)
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(SitingError::InvalidPolygon {
                vertices: self.vertices.len(),
            });
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    pub fn contains(&self, point: Point) -> bool {
        is_point_in_polygon(point, self)
    }

    pub fn area(&self) -> Result<f64> {
        polygon_area(self)
    }
}

/// Crossing-number point-in-polygon test
///
/// Casts a horizontal ray towards +x and toggles on every edge that straddles
/// the point's y. With the half-open comparison `(yi > y) != (yj > y)`, points
/// on the left/bottom edges of an axis-aligned square test inside and points on
/// the right/top edges test outside.
///
/// Returns `false` for polygons with fewer than 3 vertices.
pub fn is_point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let vertices = polygon.vertices();
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.x, point.y);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].x, vertices[i].y);
        let (xj, yj) = (vertices[j].x, vertices[j].y);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shoelace area (absolute value, so orientation does not matter)
pub fn polygon_area(polygon: &Polygon) -> Result<f64> {
    polygon.validate()?;

    let vertices = polygon.vertices();
    let n = vertices.len();
    let twice_area: f64 = (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();

    Ok(twice_area.abs() / 2.0)
}

/// Regular lattice over a polygon's bounding box
#[derive(Debug, Clone)]
pub struct GridSpec {
    polygon: Polygon,
    step: f64,
    bounds: BoundingBox,
}

impl GridSpec {
    pub fn new(polygon: Polygon, step: f64) -> Result<Self> {
        polygon.validate()?;
        if !(step.is_finite() && step > 0.0) {
            return Err(SitingError::InvalidGridStep(step));
        }
        let bounds = polygon
            .bounding_box()
            .ok_or(SitingError::InvalidPolygon { vertices: 0 })?;

        // Counted in f64 so a tiny step cannot overflow before the check
        let positions = ((bounds.width() / step + LATTICE_EPSILON).floor() + 1.0)
            * ((bounds.height() / step + LATTICE_EPSILON).floor() + 1.0);
        if !(positions <= MAX_GRID_POINTS as f64) {
            return Err(SitingError::GridTooLarge {
                points: positions,
                max: MAX_GRID_POINTS,
            });
        }

        Ok(Self {
            polygon,
            step,
            bounds,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Frame whose lattice cells coincide with this grid's points
    pub fn frame(&self) -> GridFrame {
        GridFrame::new(Point::new(self.bounds.min_x, self.bounds.min_y), self.step)
    }

    /// Number of lattice positions along x and y (inclusive of both ends)
    pub fn dimensions(&self) -> (usize, usize) {
        let nx = (self.bounds.width() / self.step + LATTICE_EPSILON).floor() as usize + 1;
        let ny = (self.bounds.height() / self.step + LATTICE_EPSILON).floor() as usize + 1;
        (nx, ny)
    }

    /// Lattice points inside the polygon, outer loop x, inner loop y
    pub fn points(&self) -> Vec<Point> {
        let (nx, ny) = self.dimensions();
        let mut points = Vec::new();

        for i in 0..nx {
            let x = self.bounds.min_x + i as f64 * self.step;
            for j in 0..ny {
                let y = self.bounds.min_y + j as f64 * self.step;
                let p = Point::new(x, y);
                if self.polygon.contains(p) {
                    points.push(p);
                }
            }
        }

        points
    }
}

/// Generate the analysis grid for a polygon
pub fn generate_grid(polygon: &Polygon, step: f64) -> Result<Vec<Point>> {
    Ok(GridSpec::new(polygon.clone(), step)?.points())
}

/// Thin a point set to `count` spatially spread points
///
/// Algorithm:
/// 1. Split the bounding box into a 3 x 3 region lattice (points on the max
///    edge fall into the last region)
/// 2. From each occupied region (first-seen order) keep the point closest to
///    the region centre
/// 3. Top up with the remaining points nearest the bounding-box centre
/// 4. Truncate to `count`
pub fn select_strategic_points(points: &[Point], count: usize) -> Vec<Point> {
    if points.len() <= count {
        return points.to_vec();
    }
    let Some(bounds) = BoundingBox::from_points(points.iter().copied()) else {
        return Vec::new();
    };

    let x_step = bounds.width() / SAMPLING_REGIONS;
    let y_step = bounds.height() / SAMPLING_REGIONS;
    let region_of = |value: f64, min: f64, step: f64| -> i64 {
        if step > 0.0 {
            (((value - min) / step) as i64).min(SAMPLING_REGIONS as i64 - 1)
        } else {
            0
        }
    };

    let mut region_index: FxHashMap<(i64, i64), usize> = FxHashMap::default();
    let mut regions: Vec<((i64, i64), Vec<Point>)> = Vec::new();
    for &p in points {
        let key = (
            region_of(p.x, bounds.min_x, x_step),
            region_of(p.y, bounds.min_y, y_step),
        );
        let slot = *region_index.entry(key).or_insert_with(|| {
            regions.push((key, Vec::new()));
            regions.len() - 1
        });
        regions[slot].1.push(p);
    }

    let mut selected: Vec<Point> = regions
        .iter()
        .filter_map(|((rx, ry), members)| {
            let center = Point::new(
                bounds.min_x + (*rx as f64 + 0.5) * x_step,
                bounds.min_y + (*ry as f64 + 0.5) * y_step,
            );
            members
                .iter()
                .copied()
                .min_by(|a, b| a.distance_to(center).total_cmp(&b.distance_to(center)))
        })
        .collect();

    if selected.len() < count {
        let center = bounds.center();
        let mut remaining: Vec<Point> = points
            .iter()
            .copied()
            .filter(|p| !selected.contains(p))
            .collect();
        remaining.sort_by(|a, b| a.distance_to(center).total_cmp(&b.distance_to(center)));
        selected.extend(remaining.into_iter().take(count - selected.len()));
    }

    selected.truncate(count);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Polygon {
        Polygon::from_coords(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)])
    }

    #[test]
    fn test_square_boundary_convention() {
        let sq = square(10.0);
        assert!(is_point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!is_point_in_polygon(Point::new(15.0, 5.0), &sq));
        // Left and bottom edges are inside, right and top edges outside
        assert!(is_point_in_polygon(Point::new(0.0, 5.0), &sq));
        assert!(is_point_in_polygon(Point::new(5.0, 0.0), &sq));
        assert!(!is_point_in_polygon(Point::new(10.0, 5.0), &sq));
        assert!(!is_point_in_polygon(Point::new(5.0, 10.0), &sq));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(!is_point_in_polygon(Point::new(0.5, 0.5), &line));
        assert!(matches!(
            polygon_area(&line),
            Err(SitingError::InvalidPolygon { vertices: 2 })
        ));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards
        let u = Polygon::from_coords(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]);
        assert!(u.contains(Point::new(1.0, 4.0)));
        assert!(u.contains(Point::new(5.0, 4.0)));
        assert!(!u.contains(Point::new(3.0, 4.0)));
        assert!(u.contains(Point::new(3.0, 1.0)));
    }

    #[test]
    fn test_area_orientation_invariant() {
        let coords = [(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)];
        let ccw = Polygon::from_coords(&coords);
        let mut reversed = coords.to_vec();
        reversed.reverse();
        let cw = Polygon::from_coords(&reversed);
        let mut rotated = coords.to_vec();
        rotated.rotate_left(2);
        let rot = Polygon::from_coords(&rotated);

        assert_relative_eq!(ccw.area().unwrap(), 12.0);
        assert_relative_eq!(cw.area().unwrap(), 12.0);
        assert_relative_eq!(rot.area().unwrap(), 12.0);
    }

    #[test]
    fn test_grid_square_step_one() {
        let grid = generate_grid(&square(10.0), 1.0).unwrap();
        // x and y in 0..=9; x = 10 or y = 10 lies on the excluded edges
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], Point::new(0.0, 0.0));
        assert_eq!(grid[1], Point::new(0.0, 1.0));
        assert_eq!(grid[10], Point::new(1.0, 0.0));
        assert!(grid.iter().all(|p| square(10.0).contains(*p)));
    }

    #[test]
    fn test_grid_fractional_step_is_index_based() {
        let poly = square(0.045);
        let grid = generate_grid(&poly, 0.01).unwrap();
        // 0.00..=0.04 on both axes, all strictly inside
        assert_eq!(grid.len(), 25);
        assert_eq!(grid[6], Point::new(0.01, 0.01));
    }

    #[test]
    fn test_grid_rejects_invalid_input() {
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            generate_grid(&line, 1.0),
            Err(SitingError::InvalidPolygon { .. })
        ));
        assert!(matches!(
            generate_grid(&square(1.0), 0.0),
            Err(SitingError::InvalidGridStep(_))
        ));
    }

    #[test]
    fn test_grid_rejects_oversized_lattice() {
        let result = generate_grid(&square(1000.0), 1e-6);
        assert!(matches!(
            result,
            Err(SitingError::GridTooLarge { max: MAX_GRID_POINTS, .. })
        ));
        // 2000 x 2000 positions sits exactly at the limit
        assert!(GridSpec::new(square(1999.0), 1.0).is_ok());
        assert!(GridSpec::new(square(2000.0), 1.0).is_err());
    }

    #[test]
    fn test_grid_is_deterministic() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (7.3, 1.1), (5.2, 6.4), (-1.0, 4.0)]);
        let a = generate_grid(&poly, 0.37).unwrap();
        let b = generate_grid(&poly, 0.37).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_strategic_sampling_spreads_points() {
        let grid = generate_grid(&square(9.0), 1.0).unwrap();
        let picked = select_strategic_points(&grid, 9);
        assert_eq!(picked.len(), 9);

        // One pick per 3 x 3 region
        let mut regions: Vec<(i64, i64)> = picked
            .iter()
            .map(|p| {
                (
                    ((p.x * 3.0 / 8.0) as i64).min(2),
                    ((p.y * 3.0 / 8.0) as i64).min(2),
                )
            })
            .collect();
        regions.sort();
        regions.dedup();
        assert_eq!(regions.len(), 9);
    }

    #[test]
    fn test_strategic_sampling_small_input_unchanged() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(select_strategic_points(&pts, 10), pts);
    }

    #[test]
    fn test_strategic_sampling_tops_up_from_center() {
        let grid = generate_grid(&square(9.0), 1.0).unwrap();
        let picked = select_strategic_points(&grid, 12);
        assert_eq!(picked.len(), 12);
        let mut unique = picked.clone();
        unique.dedup();
        assert_eq!(unique.len(), 12);
    }
}
