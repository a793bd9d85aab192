use bear_core::{Point, Range};

use crate::distance::euclidean;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// A bounded, uniform 4-connected plane.
///
/// Neighbours are the cardinal points inside the range; there is no
/// wraparound. Step cost and heuristic are both Euclidean distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane {
    range: Range,
}

impl Plane {
    /// A plane covering `range`.
    pub fn with_range(range: Range) -> Self {
        Self { range }
    }
}

impl Pather for Plane {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(p.neighbors_4().into_iter().filter(|&n| self.range.contains(n)));
    }
}

impl WeightedPather for Plane {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        euclidean(from, to)
    }
}

impl AstarPather for Plane {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> f64 {
        euclidean(from, to)
    }
}
