use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Arrow;
use crate::dataset::Dataset;
use crate::geom::Vec2F;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSettings {
    /// Horizontal distance per integration leg, in bins.
    pub x_step: u32,
    /// Vertical spacing between seed rows, in bins.
    pub y_step: u32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            x_step: 20,
            y_step: 20,
        }
    }
}

/// One traced half-line: the directed segments from a seed outward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracedLine {
    pub segments: Vec<Arrow>,
}

/// Traces field lines from seeds along the vertical line through z = 0,
/// one half-line per seed and direction.
pub fn trace_lines(dataset: &Dataset, settings: &TraceSettings) -> Vec<TracedLine> {
    let x_axis = dataset.field_x.x_axis;
    let y_axis = dataset.field_x.y_axis;
    let ix_start = x_axis.find_bin(0.0);
    let iy_start = y_axis.find_bin(0.0);

    let mut lines = Vec::new();
    for iy in seed_rows(y_axis.bins, settings.y_step, iy_start) {
        let seed = Vec2F::new(x_axis.center(ix_start), y_axis.center(iy));
        for direction in [1.0f32, -1.0] {
            lines.push(trace_half(dataset, settings, seed, direction));
        }
    }
    lines
}

/// Seed row indices: one row per `y_step` across the usable axis range,
/// centered on `iy_start`. Rows may fall outside the axis for small
/// grids; the trace then ends at its first out-of-domain step.
pub fn seed_rows(y_bins: u32, y_step: u32, iy_start: i64) -> Vec<i64> {
    let n_lines = 1 + (i64::from(y_bins) - 10) / i64::from(y_step);
    (0..n_lines)
        .map(|line| iy_start + (line - n_lines / 2) * i64::from(y_step))
        .collect()
}

fn trace_half(
    dataset: &Dataset,
    settings: &TraceSettings,
    seed: Vec2F,
    direction: f32,
) -> TracedLine {
    let x_axis = dataset.field_x.x_axis;
    let step = direction * settings.x_step as f32 * x_axis.bin_width();

    let mut z = seed.x;
    let mut x = seed.y;
    let mut segments = Vec::new();

    while z.abs() < x_axis.max {
        let bz = dataset.field_z.sample(z, x);
        let bx = dataset.field_x.sample(z, x);
        let next_z = z + step;
        let next_x = x + step * bx / bz;

        // A purely vertical field (bz ~ 0) makes the step non-finite;
        // the line just ends there.
        if !next_z.is_finite()
            || !next_x.is_finite()
            || z < x_axis.min
            || next_z < x_axis.min
        {
            debug!(z, x, bz, bx, "field line terminated");
            break;
        }

        let tail = Vec2F::new(z, x);
        let tip = Vec2F::new(next_z, next_x);
        // Both halves point away from the seed.
        segments.push(if direction > 0.0 {
            Arrow::new(tail, tip)
        } else {
            Arrow::new(tip, tail)
        });

        z = next_z;
        x = next_x;
    }

    TracedLine { segments }
}
