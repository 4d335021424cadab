use serde::{Deserialize, Serialize};

use super::Arrow;
use crate::dataset::Dataset;
use crate::geom::Vec2F;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowSettings {
    /// First sampled bin index on each axis.
    pub first_bin: usize,
    /// Bin stride between samples.
    pub stride: usize,
    /// Multiplier from field component to arrow half-length.
    pub scale: f32,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            first_bin: 4,
            stride: 10,
            scale: 2.0,
        }
    }
}

/// Samples the in-plane field on a regular subgrid and turns each sample
/// into an arrow through the bin center: length proportional to the local
/// field, direction following its sign. A zero field yields a zero-length
/// arrow at the bin center.
pub fn sample_arrows(dataset: &Dataset, settings: &ArrowSettings) -> Vec<Arrow> {
    let x_axis = dataset.field_x.x_axis;
    let y_axis = dataset.field_x.y_axis;
    let scale = settings.scale;

    let mut arrows = Vec::new();
    for ix in sampled_bins(x_axis.bins, settings.first_bin, settings.stride) {
        for iy in sampled_bins(y_axis.bins, settings.first_bin, settings.stride) {
            let fx = dataset.field_x.value(ix, iy);
            let fz = dataset.field_z.value(ix, iy);
            let z = x_axis.center(ix as i64);
            let x = y_axis.center(iy as i64);

            arrows.push(Arrow::new(
                Vec2F::new(z - scale * fz, x - scale * fx),
                Vec2F::new(z + scale * fz, x + scale * fx),
            ));
        }
    }
    arrows
}

fn sampled_bins(bins: u32, first_bin: usize, stride: usize) -> impl Iterator<Item = usize> {
    (first_bin..bins as usize).step_by(stride)
}
