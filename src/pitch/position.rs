//! Grid coordinates.

use serde::{Deserialize, Serialize};

/// The eight compass offsets, in scatter order.
///
/// Scatter rolls index into the in-bounds subset of this list, so the order
/// is part of the replay contract.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A cell on the pitch. `x` runs along the length (end zone to end zone),
/// `y` across the width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by an offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// All eight surrounding cells, ignoring pitch bounds.
    pub fn surrounding(self) -> impl Iterator<Item = Position> {
        DIRECTIONS.into_iter().map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Chebyshev distance: diagonal steps cost the same as straight ones.
    #[must_use]
    pub fn distance(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// True when the two cells touch (including diagonally).
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    /// Unit step from `self` towards `other` on each axis.
    #[must_use]
    pub fn direction_to(self, other: Position) -> (i32, i32) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_chebyshev() {
        let a = Position::new(5, 7);
        assert_eq!(a.distance(Position::new(8, 9)), 3);
        assert_eq!(a.distance(Position::new(5, 7)), 0);
        assert!(a.is_adjacent(Position::new(6, 8)));
        assert!(!a.is_adjacent(Position::new(7, 7)));
    }

    #[test]
    fn test_surrounding_has_eight_distinct_cells() {
        let cells: Vec<_> = Position::new(0, 0).surrounding().collect();
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|c| c.is_adjacent(Position::new(0, 0))));
    }

    #[test]
    fn test_direction_to() {
        let from = Position::new(4, 4);
        assert_eq!(from.direction_to(Position::new(5, 4)), (1, 0));
        assert_eq!(from.direction_to(Position::new(3, 5)), (-1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(13, 7).to_string(), "(13, 7)");
    }
}
