use bear_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Euclidean (L2) distance between two points.
///
/// Used both as the A* heuristic and as the step cost, so unit moves cost
/// exactly `1.0`.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from((a.x - b.x).abs());
    let dy = f64::from((a.y - b.y).abs());
    (dx * dx + dy * dy).sqrt()
}
