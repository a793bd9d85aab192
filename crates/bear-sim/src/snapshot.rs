//! Serializable copies of the grid handed to observers.

use bear_core::{CellState, Grid, Point};
use serde::{Deserialize, Serialize};

/// The full grid at one instant, row-major, one state per cell.
///
/// Serializes as an array of rows, each an array of integer state codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    rows: Vec<Vec<CellState>>,
}

impl Snapshot {
    /// Copy the current contents of `grid`.
    pub fn of(grid: &Grid) -> Self {
        Self {
            rows: grid.rows().map(<[CellState]>::to_vec).collect(),
        }
    }

    /// State at `p`, or `None` outside the snapshot.
    pub fn get(&self, p: Point) -> Option<CellState> {
        let x = usize::try_from(p.x).ok()?;
        let y = usize::try_from(p.y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Count how many cells equal `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.rows.iter().flatten().filter(|&&s| s == state).count()
    }

    /// First point holding `state`, in row-major order.
    pub fn find_one(&self, state: CellState) -> Option<Point> {
        self.rows.iter().enumerate().find_map(|(y, row)| {
            row.iter()
                .position(|&s| s == state)
                .map(|x| Point::new(x as i32, y as i32))
        })
    }

    /// JSON wire form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
