pub mod arrows;
pub mod trace;

use thiserror::Error;

use crate::geom::Vec2F;
use crate::grid::Grid2;

/// A directed overlay segment in data coordinates, drawn tail to tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: Vec2F,
    pub tip: Vec2F,
}

impl Arrow {
    pub fn new(tail: Vec2F, tip: Vec2F) -> Self {
        Self { tail, tip }
    }

    /// Zero-length arrows are valid (zero local field) but have no
    /// drawable direction.
    pub fn is_degenerate(&self) -> bool {
        self.tail == self.tip
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing backend error: {0}")]
    Backend(String),
}

/// Minimum of the logarithmic color scale; keeps empty and non-positive
/// thickness bins off the log axis.
pub const SCALE_FLOOR: f32 = 1e-6;

/// Log10 color scale over `[floor, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    floor: f32,
    max: f32,
}

impl LogScale {
    pub fn new(floor: f32, max: f32) -> Self {
        let floor = if floor > 0.0 { floor } else { SCALE_FLOOR };
        Self {
            floor,
            max: max.max(floor),
        }
    }

    pub fn for_grid(grid: &Grid2, floor: f32) -> Self {
        let max = grid.value_range().map_or(floor, |range| range.max);
        Self::new(floor, max)
    }

    /// Position of `value` on the scale, in `[0, 1]`. Values at or below
    /// the floor map to 0, values at or above the maximum to 1.
    pub fn normalized(&self, value: f32) -> f64 {
        let lo = f64::from(self.floor).log10();
        let hi = f64::from(self.max).log10();
        if hi <= lo {
            return 0.0;
        }
        let value = f64::from(value.max(self.floor)).log10();
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_arrow() {
        let p = Vec2F::new(1.0, 2.0);
        assert!(Arrow::new(p, p).is_degenerate());
        assert!(!Arrow::new(p, Vec2F::new(1.0, 2.5)).is_degenerate());
    }

    #[test]
    fn scale_endpoints() {
        let scale = LogScale::new(1e-6, 1.0);
        assert_eq!(scale.normalized(1e-6), 0.0);
        assert_eq!(scale.normalized(1.0), 1.0);
        assert!((scale.normalized(1e-3) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn non_positive_values_clamp_to_floor() {
        let scale = LogScale::new(1e-6, 1.0);
        assert_eq!(scale.normalized(0.0), 0.0);
        assert_eq!(scale.normalized(-4.0), 0.0);
    }

    #[test]
    fn non_positive_floor_falls_back() {
        let scale = LogScale::new(0.0, 1.0);
        assert_eq!(scale.normalized(0.0), 0.0);
        assert_eq!(scale.normalized(1.0), 1.0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let scale = LogScale::new(1e-6, 1e-6);
        assert_eq!(scale.normalized(5.0), 0.0);
    }

    #[test]
    fn empty_grid_scale() {
        use crate::geom::Axis;
        use crate::grid::Grid2;
        use ndarray::Array2;

        let grid = Grid2::new(
            Axis::new(0.0, 1.0, 2),
            Axis::new(0.0, 1.0, 2),
            Array2::zeros((2, 2)),
        );
        let scale = LogScale::for_grid(&grid, SCALE_FLOOR);
        assert_eq!(scale.normalized(1.0), 0.0);
    }
}
