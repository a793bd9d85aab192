//! The [`Grid`] type: a fixed-size 2D map of [`CellState`]s.
//!
//! Cells are stored row-major and addressed by [`Point`]. Every accessor
//! treats an out-of-range point as a caller defect: the panicking accessors
//! ([`get`](Grid::get), [`set`](Grid::set), [`set_many`](Grid::set_many))
//! fail fast, and the `try_` variants report [`GridError::OutOfBounds`].
//! Nothing is ever clamped or wrapped.

use crate::cell::CellState;
use crate::error::{GridError, GridResult};
use crate::geom::{Point, Range};

/// A 2D grid of [`CellState`]s with exclusive, owned storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<CellState>,
    width: i32,
    height: i32,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with
    /// [`CellState::Empty`].
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            cells: vec![CellState::Empty; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The bounding range `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::sized(self.width, self.height)
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> GridResult<usize> {
        if !self.contains(p) {
            return Err(GridError::OutOfBounds {
                point: p,
                width: self.width,
                height: self.height,
            });
        }
        Ok((p.y as usize) * (self.width as usize) + (p.x as usize))
    }

    /// Read the cell at `p`.
    pub fn try_get(&self, p: Point) -> GridResult<CellState> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Write the cell at `p`.
    pub fn try_set(&mut self, p: Point, state: CellState) -> GridResult<()> {
        let i = self.index(p)?;
        self.cells[i] = state;
        Ok(())
    }

    /// Read the cell at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[track_caller]
    pub fn get(&self, p: Point) -> CellState {
        match self.try_get(p) {
            Ok(state) => state,
            Err(e) => panic!("{e}"),
        }
    }

    /// Write the cell at `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[track_caller]
    pub fn set(&mut self, p: Point, state: CellState) {
        if let Err(e) = self.try_set(p, state) {
            panic!("{e}");
        }
    }

    /// Write `state` to every point in `points`.
    ///
    /// All points are validated before any cell changes, so a bad point
    /// leaves the grid untouched.
    ///
    /// # Panics
    ///
    /// Panics if any point is outside the grid.
    #[track_caller]
    pub fn set_many<'a>(&mut self, points: impl IntoIterator<Item = &'a Point>, state: CellState) {
        let idxs: GridResult<Vec<usize>> = points.into_iter().map(|&p| self.index(p)).collect();
        match idxs {
            Ok(idxs) => {
                for i in idxs {
                    self.cells[i] = state;
                }
            }
            Err(e) => panic!("{e}"),
        }
    }

    /// First point holding `state` in row-major order (increasing y, then
    /// increasing x).
    pub fn find_one(&self, state: CellState) -> Option<Point> {
        self.find_all(state).next()
    }

    /// Every point holding `state`, lazily, in row-major order.
    pub fn find_all(&self, state: CellState) -> impl Iterator<Item = Point> + '_ {
        self.iter()
            .filter(move |&(_, s)| s == state)
            .map(|(p, _)| p)
    }

    /// Rewrite every `from` cell to `to`. Returns how many cells changed.
    pub fn replace(&mut self, from: CellState, to: CellState) -> usize {
        let mut n = 0;
        for c in self.cells.iter_mut().filter(|c| **c == from) {
            *c = to;
            n += 1;
        }
        n
    }

    /// Count how many cells equal `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Row-major iterator over `(Point, CellState)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Rows of the grid, top to bottom, each left to right.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        // `max(1)` keeps `chunks` happy on a zero-width grid; there are no
        // cells to yield in that case anyway.
        self.cells.chunks(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_new_is_empty() {
        let g = Grid::new(4, 3);
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.count(CellState::Empty), 12);
        assert_eq!(g.get(Point::new(3, 2)), CellState::Empty);
    }

    #[test]
    fn grid_set_and_get() {
        let mut g = Grid::new(4, 3);
        g.set(Point::new(2, 1), CellState::Obstacle);
        assert_eq!(g.get(Point::new(2, 1)), CellState::Obstacle);
        assert_eq!(g.get(Point::new(1, 2)), CellState::Empty);
    }

    #[test]
    fn try_accessors_report_out_of_bounds() {
        let mut g = Grid::new(4, 3);
        let err = g.try_get(Point::new(4, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                point: Point::new(4, 0),
                width: 4,
                height: 3
            }
        );
        assert!(g.try_set(Point::new(0, -1), CellState::Path).is_err());
        assert!(g.try_get(Point::new(3, 2)).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside the 4x3 grid")]
    fn get_out_of_bounds_panics() {
        let g = Grid::new(4, 3);
        g.get(Point::new(0, 3));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn set_out_of_bounds_panics() {
        let mut g = Grid::new(4, 3);
        g.set(Point::new(-1, 0), CellState::Obstacle);
    }

    #[test]
    fn set_many_is_all_or_nothing() {
        let mut g = Grid::new(3, 3);
        g.set_many(&[Point::new(0, 0), Point::new(1, 1)], CellState::Path);
        assert_eq!(g.count(CellState::Path), 2);

        let bad = [Point::new(2, 2), Point::new(9, 9)];
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            g.set_many(&bad, CellState::Obstacle);
        }));
        assert!(result.is_err());
        assert_eq!(g.get(Point::new(2, 2)), CellState::Empty);
    }

    #[test]
    fn find_one_uses_row_major_order() {
        let mut g = Grid::new(4, 4);
        g.set(Point::new(0, 2), CellState::Obstacle);
        g.set(Point::new(3, 1), CellState::Obstacle);
        assert_eq!(g.find_one(CellState::Obstacle), Some(Point::new(3, 1)));
        assert_eq!(g.find_one(CellState::GoalOnEmpty), None);
    }

    #[test]
    fn find_all_is_lazy_and_ordered() {
        let mut g = Grid::new(3, 2);
        g.set(Point::new(2, 1), CellState::Path);
        g.set(Point::new(1, 0), CellState::Path);
        g.set(Point::new(0, 1), CellState::Path);
        let mut it = g.find_all(CellState::Path);
        assert_eq!(it.next(), Some(Point::new(1, 0)));
        let rest: Vec<_> = it.collect();
        assert_eq!(rest, vec![Point::new(0, 1), Point::new(2, 1)]);
    }

    #[test]
    fn replace_rewrites_every_match() {
        let mut g = Grid::new(3, 3);
        g.set_many(&[Point::new(0, 0), Point::new(2, 2)], CellState::AgentOnPath);
        assert_eq!(g.replace(CellState::AgentOnPath, CellState::Path), 2);
        assert_eq!(g.count(CellState::AgentOnPath), 0);
        assert_eq!(g.count(CellState::Path), 2);
        assert_eq!(g.replace(CellState::GoalOnPath, CellState::Path), 0);
    }

    #[test]
    fn rows_are_row_major() {
        let mut g = Grid::new(3, 2);
        g.set(Point::new(2, 0), CellState::GoalOnEmpty);
        g.set(Point::new(0, 1), CellState::AgentOnEmpty);
        let rows: Vec<_> = g.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], CellState::GoalOnEmpty);
        assert_eq!(rows[1][0], CellState::AgentOnEmpty);
    }
}
