//! Fractal module - Koch snowflake curve generation

mod koch;

pub use koch::{generate, generate_checked, subdivide, FractalError, KochCache, Point, Polygon};
