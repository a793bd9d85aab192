//! A* pathfinding on bounded 2D grids.
//!
//! Searches run through [`PathRange`], which owns and reuses its node array
//! so that repeated queries incur no per-node allocations after warm-up.
//! [`search`] is a one-shot convenience for callers that do not keep one.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbour enumeration |
//! | [`WeightedPather`] : [`Pather`] | step cost |
//! | [`AstarPather`] : [`WeightedPather`] | admissible heuristic |
//!
//! [`Plane`] implements all three for a uniform 4-connected grid using
//! Euclidean distance as both step cost and heuristic.

mod astar;
mod distance;
mod pathrange;
mod plane;
mod traits;

pub use astar::{SearchResult, search};
pub use distance::{euclidean, manhattan};
pub use pathrange::PathRange;
pub use plane::Plane;
pub use traits::{AstarPather, Pather, WeightedPather};
