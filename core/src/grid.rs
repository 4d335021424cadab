use ndarray::Array2;

use crate::geom::{Axis, Range};

/// A binned 2-D sample grid with its axis geometry.
///
/// Values are indexed `[ix, iy]` = (column, row); the x axis runs along
/// the horizontal (z) coordinate, the y axis along the vertical (x)
/// coordinate of the mapped plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2 {
    pub x_axis: Axis,
    pub y_axis: Axis,
    values: Array2<f32>,
}

impl Grid2 {
    pub fn new(x_axis: Axis, y_axis: Axis, values: Array2<f32>) -> Self {
        debug_assert_eq!(
            values.dim(),
            (x_axis.bins as usize, y_axis.bins as usize)
        );
        Self {
            x_axis,
            y_axis,
            values,
        }
    }

    pub fn value(&self, ix: usize, iy: usize) -> f32 {
        self.values[[ix, iy]]
    }

    /// Value of the bin enclosing the continuous coordinates `(z, x)`.
    ///
    /// Out-of-domain coordinates read as 0.0, like the empty under- and
    /// overflow bins of the stored histograms.
    pub fn sample(&self, z: f32, x: f32) -> f32 {
        let ix = self.x_axis.find_bin(z);
        let iy = self.y_axis.find_bin(x);
        if self.x_axis.contains_bin(ix) && self.y_axis.contains_bin(iy) {
            self.values[[ix as usize, iy as usize]]
        } else {
            0.0
        }
    }

    pub fn value_range(&self) -> Option<Range<f32>> {
        Range::from_iter_val(self.values.iter().copied())
    }

    pub fn same_binning(&self, other: &Grid2) -> bool {
        self.x_axis == other.x_axis && self.y_axis == other.y_axis
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }
}
