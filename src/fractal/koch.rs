//! Koch Snowflake Generator
//! Builds the closed snowflake polygon by repeated edge subdivision.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Circumradius of the order-0 triangle.
pub const BASE_RADIUS: f64 = 10.0 / 1.732_050_807_568_877_2;

/// Vertex angles of the order-0 triangle, in degrees.
const BASE_ANGLES_DEG: [f64; 3] = [90.0, 210.0, 330.0];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FractalError {
    #[error("Fractal order must be non-negative, got {0}")]
    NegativeOrder(i64),
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed polygon. The last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges in order, including the closing edge (last, first).
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// Order-0 equilateral triangle centered at the origin.
fn base_triangle() -> Polygon {
    let points = BASE_ANGLES_DEG
        .iter()
        .map(|deg| {
            let theta = deg.to_radians();
            Point::new(BASE_RADIUS * theta.cos(), BASE_RADIUS * theta.sin())
        })
        .collect();
    Polygon::new(points)
}

/// Replace every edge of `polygon` with the four points of a Koch bump.
///
/// For an edge `p1 -> p2` with `d = p2 - p1` the emitted points are:
/// `p1`, the 1/3 point, the apex `p1 + d/2 + (|d|/3)(-sin θ, cos θ)` and
/// the 2/3 point, where `θ = atan2(dy, dx)`. `p2` is emitted by the next edge.
pub fn subdivide(polygon: &Polygon) -> Polygon {
    let mut points = Vec::with_capacity(polygon.len() * 4);

    for (p1, p2) in polygon.edges() {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;

        let p3 = Point::new(p1.x + dx / 3.0, p1.y + dy / 3.0);
        let p5 = Point::new(p1.x + 2.0 * dx / 3.0, p1.y + 2.0 * dy / 3.0);

        let angle = dy.atan2(dx);
        let height = (dx * dx + dy * dy).sqrt() / 3.0;
        let p4 = Point::new(
            p1.x + dx / 2.0 - height * angle.sin(),
            p1.y + dy / 2.0 + height * angle.cos(),
        );

        points.extend_from_slice(&[p1, p3, p4, p5]);
    }

    Polygon::new(points)
}

/// Generate the Koch snowflake of the given order.
///
/// The result has `3 * 4^order` points. There is no upper bound here;
/// callers are expected to clamp `order` to a sensible range.
pub fn generate(order: u32) -> Polygon {
    let mut polygon = base_triangle();
    for _ in 0..order {
        polygon = subdivide(&polygon);
    }
    polygon
}

/// Boundary check for orders coming from untyped input.
pub fn generate_checked(order: i64) -> Result<Polygon, FractalError> {
    let order = u32::try_from(order).map_err(|_| FractalError::NegativeOrder(order))?;
    Ok(generate(order))
}

/// Per-order memo of generated polygons.
#[derive(Debug, Default)]
pub struct KochCache {
    polygons: HashMap<u32, Arc<Polygon>>,
}

impl KochCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the polygon for `order`, generating it on first use.
    pub fn get(&mut self, order: u32) -> Arc<Polygon> {
        self.polygons
            .entry(order)
            .or_insert_with(|| {
                tracing::debug!(order, "generating koch snowflake");
                Arc::new(generate(order))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn dist(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn order_zero_is_centered_equilateral_triangle() {
        let tri = generate(0);
        assert_eq!(tri.len(), 3);

        let radius = 10.0 / 3f64.sqrt();
        for p in tri.points() {
            assert!((dist(*p, Point::new(0.0, 0.0)) - radius).abs() < EPS);
        }

        let sides: Vec<f64> = tri.edges().map(|(a, b)| dist(a, b)).collect();
        assert!((sides[0] - sides[1]).abs() < EPS);
        assert!((sides[1] - sides[2]).abs() < EPS);
        assert!((sides[0] - 10.0).abs() < EPS);

        let cx: f64 = tri.xs().iter().sum::<f64>() / 3.0;
        let cy: f64 = tri.ys().iter().sum::<f64>() / 3.0;
        assert!(cx.abs() < EPS && cy.abs() < EPS);
    }

    #[test]
    fn first_vertex_points_up() {
        let tri = generate(0);
        let top = tri.points()[0];
        assert!(top.x.abs() < EPS);
        assert!((top.y - 10.0 / 3f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn point_counts_follow_powers_of_four() {
        for order in 0..=6u32 {
            assert_eq!(generate(order).len(), 3 * 4usize.pow(order));
        }
        assert_eq!(generate(3).len(), 192);
    }

    #[test]
    fn subdivision_keeps_original_vertices_in_place() {
        let base = generate(1);
        let next = generate(2);
        for (i, p) in base.points().iter().enumerate() {
            assert_eq!(next.points()[i * 4], *p);
        }
    }

    #[test]
    fn apex_sits_a_third_of_the_edge_off_its_midpoint() {
        let base = generate(0);
        let next = generate(1);
        for (i, (p1, p2)) in base.edges().enumerate() {
            let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
            let mid = Point::new(p1.x + dx / 2.0, p1.y + dy / 2.0);
            let apex = next.points()[i * 4 + 2];
            let (ox, oy) = (apex.x - mid.x, apex.y - mid.y);

            assert!((dist(mid, apex) - dist(p1, p2) / 3.0).abs() < EPS);
            assert!((ox * dx + oy * dy).abs() < EPS);
        }
    }

    #[test]
    fn negative_order_is_rejected() {
        assert_eq!(generate_checked(-1), Err(FractalError::NegativeOrder(-1)));
        assert_eq!(generate_checked(2).map(|p| p.len()), Ok(48));
    }

    #[test]
    fn cache_returns_same_polygon() {
        let mut cache = KochCache::new();
        let a = cache.get(3);
        let b = cache.get(3);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, generate(3));
        assert_eq!(cache.len(), 1);
    }

    proptest! {
        #[test]
        fn generate_is_deterministic(order in 0u32..=5) {
            prop_assert_eq!(generate(order), generate(order));
        }

        #[test]
        fn next_order_is_one_subdivision_step(order in 0u32..=5) {
            let current = generate(order);
            let next = generate(order + 1);
            prop_assert_eq!(next.len(), current.len() * 4);
            prop_assert_eq!(subdivide(&current), next);
        }
    }
}
