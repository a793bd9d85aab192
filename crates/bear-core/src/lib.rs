//! **bear-core**: grid and geometry types for the hungry-bear simulation.
//!
//! This crate provides the foundational types shared by the pathfinder and
//! the simulation controller: integer geometry, the cell-state vocabulary
//! exposed to renderers, and a fixed-size grid with row-major scans.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::{CellState, legend};
pub use error::{GridError, GridResult};
pub use geom::{Point, Range};
pub use grid::Grid;
