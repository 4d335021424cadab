use derive_more::{Add, Constructor, Mul, Sub, Sum};
use serde::{Deserialize, Serialize};

#[derive(Add, Sub, Mul, Sum, Constructor, Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

pub type Vec2F = Vec2<f32>;

impl<T> From<(T, T)> for Vec2<T> {
    fn from((x, y): (T, T)) -> Self {
        Vec2 { x, y }
    }
}

impl<T> From<Vec2<T>> for (T, T) {
    fn from(v: Vec2<T>) -> Self {
        (v.x, v.y)
    }
}

/// Uniform binning of one coordinate axis.
///
/// Bins are 0-based: bin `i` covers `[edge(i), edge(i + 1))`. Center and
/// edge arithmetic is plain linear extrapolation, so out-of-range bin
/// indices still map to well-defined coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct Axis {
    pub min: f32,
    pub max: f32,
    pub bins: u32,
}

impl Axis {
    pub fn bin_width(&self) -> f32 {
        (self.max - self.min) / self.bins as f32
    }

    pub fn edge(&self, bin: i64) -> f32 {
        self.min + bin as f32 * self.bin_width()
    }

    pub fn center(&self, bin: i64) -> f32 {
        self.min + (bin as f32 + 0.5) * self.bin_width()
    }

    /// The bin enclosing `coord` (floor semantics). Coordinates outside
    /// the axis map to out-of-range indices, not to the nearest valid bin.
    pub fn find_bin(&self, coord: f32) -> i64 {
        ((coord - self.min) / self.bin_width()).floor() as i64
    }

    pub fn contains_bin(&self, bin: i64) -> bool {
        (0..i64::from(self.bins)).contains(&bin)
    }
}

/// Closed min/max value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<N> {
    pub min: N,
    pub max: N,
}

impl<N> Range<N> {
    pub fn new(min: N, max: N) -> Self {
        Self { min, max }
    }
}

impl<N: PartialOrd + Copy> Range<N> {
    pub fn expand(&self, new: N) -> Self {
        Self::new(
            if self.min < new { self.min } else { new },
            if self.max > new { self.max } else { new },
        )
    }

    pub fn from_iter_val(iter: impl IntoIterator<Item = N>) -> Option<Range<N>> {
        iter.into_iter().fold(None, |acc, n| match acc {
            Some(acc) => Some(acc.expand(n)),
            None => Some(Range::new(n, n)),
        })
    }
}

impl<N: std::ops::Sub<Output = N> + Copy> Range<N> {
    pub fn width(&self) -> N {
        self.max - self.min
    }
}
