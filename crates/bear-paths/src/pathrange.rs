use bear_core::{Point, Range};
use ordered_float::OrderedFloat;

// ---------------------------------------------------------------------------
// Internal node for A* priority-queue searches
// ---------------------------------------------------------------------------

/// Per-point search scores. Only meaningful when `generation` matches the
/// running search; anything older is treated as never visited.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) f: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: usize::MAX,
            generation: 0,
            open: false,
            closed: false,
        }
    }
}

/// Reference into the node array, ordered by `(f, pos)` for use in
/// `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) pos: Point,
    pub(crate) f: OrderedFloat<f64>,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest (f, pos) first.
        other.f.cmp(&self.f).then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Central coordinator for pathfinding on a grid rectangle.
///
/// `PathRange` owns the A* node array so that repeated searches incur no
/// per-node allocations after the first use. Scores from one search are
/// invalidated wholesale by bumping a generation counter rather than by
/// clearing the array.
pub struct PathRange {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) astar_nodes: Vec<Node>,
    pub(crate) astar_generation: u32,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Create a new `PathRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            width: rng.width().max(0) as usize,
            astar_nodes: vec![Node::default(); rng.len()],
            astar_generation: 0,
            nbuf: Vec::with_capacity(4),
        }
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}
