//! Grid access errors.

use thiserror::Error;

use crate::geom::Point;

/// Errors raised by [`Grid`](crate::Grid) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("point {point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: i32,
        height: i32,
    },
}

/// Shorthand result type for grid accessors.
pub type GridResult<T> = Result<T, GridError>;
