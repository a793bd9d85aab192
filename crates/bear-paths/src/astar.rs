use std::collections::BinaryHeap;

use bear_core::{Point, Range};
use ordered_float::OrderedFloat;

use crate::PathRange;
use crate::pathrange::NodeRef;
use crate::plane::Plane;
use crate::traits::AstarPather;

/// Outcome of an A* search.
///
/// `NoPathFound` is an ordinary answer for an unsolvable layout, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// Points from the start's successor up to and including the goal.
    /// Empty when start and goal coincide.
    Found(Vec<Point>),
    /// The goal cannot be reached from the start.
    NoPathFound,
}

impl SearchResult {
    /// Whether a path was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    /// Borrow the path, if any.
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NoPathFound => None,
        }
    }

    /// Take the path, if any.
    pub fn into_path(self) -> Option<Vec<Point>> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NoPathFound => None,
        }
    }
}

impl PathRange {
    /// Compute the shortest path from `from` to `to` using A*.
    ///
    /// `blocked` seeds the closed set, so those points are never entered.
    /// The frontier is expanded in `(f, point)` order: among nodes with equal
    /// `f`, the lexicographically smallest point goes first. A neighbour's
    /// recorded route is only replaced by a strictly cheaper one, so the
    /// earlier-recorded route wins ties.
    ///
    /// The returned path excludes `from` and includes `to`. Endpoints outside
    /// the current range yield [`SearchResult::NoPathFound`].
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        blocked: impl IntoIterator<Item = Point>,
    ) -> SearchResult {
        let (Some(start_idx), Some(goal_idx)) = (self.idx(from), self.idx(to)) else {
            return SearchResult::NoPathFound;
        };

        // Bump generation to lazily invalidate all nodes.
        self.astar_generation = self.astar_generation.wrapping_add(1);
        let cur_gen = self.astar_generation;

        for b in blocked {
            let Some(bi) = self.idx(b) else {
                continue;
            };
            let node = &mut self.astar_nodes[bi];
            node.generation = cur_gen;
            node.open = false;
            node.closed = true;
        }

        // Initialise the start node.
        {
            let node = &mut self.astar_nodes[start_idx];
            if node.generation != cur_gen {
                node.generation = cur_gen;
                node.closed = false;
            }
            node.g = 0.0;
            node.h = pather.estimate(from, to);
            node.f = node.h;
            node.parent = usize::MAX;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            pos: from,
            f: OrderedFloat(self.astar_nodes[start_idx].f),
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip entries superseded by a cheaper relaxation or already expanded.
            {
                let node = &self.astar_nodes[ci];
                if node.generation != cur_gen || !node.open || OrderedFloat(node.f) != current.f {
                    continue;
                }
            }

            if ci == goal_idx {
                break 'search true;
            }

            let current_g = {
                let node = &mut self.astar_nodes[ci];
                node.open = false;
                node.closed = true;
                node.g
            };
            let current_point = current.pos;

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };

                let n = &mut self.astar_nodes[ni];
                if n.generation != cur_gen {
                    n.generation = cur_gen;
                    n.open = false;
                    n.closed = false;
                }
                if n.closed {
                    continue;
                }

                let tentative_g = current_g + pather.cost(current_point, np);
                if n.open && tentative_g >= n.g {
                    continue;
                }

                n.g = tentative_g;
                n.h = pather.estimate(np, to);
                n.f = n.g + n.h;
                n.parent = ci;
                n.open = true;

                open.push(NodeRef {
                    idx: ni,
                    pos: np,
                    f: OrderedFloat(n.f),
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return SearchResult::NoPathFound;
        }

        // Walk the back-pointers from the goal, stopping short of the start.
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != start_idx {
            path.push(self.point(ci));
            ci = self.astar_nodes[ci].parent;
        }
        path.reverse();
        SearchResult::Found(path)
    }

    /// A* over the whole range as a uniform 4-connected [`Plane`].
    pub fn search(
        &mut self,
        start: Point,
        goal: Point,
        blocked: impl IntoIterator<Item = Point>,
    ) -> SearchResult {
        let plane = Plane::with_range(self.rng);
        self.astar_path(&plane, start, goal, blocked)
    }
}

/// One-shot A* search on a `width × height` plane.
///
/// Convenience over [`PathRange::search`] for callers that do not keep a
/// `PathRange` around between searches.
pub fn search(
    width: i32,
    height: i32,
    start: Point,
    goal: Point,
    blocked: impl IntoIterator<Item = Point>,
) -> SearchResult {
    PathRange::new(Range::sized(width, height)).search(start, goal, blocked)
}
