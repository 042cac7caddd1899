//! Integer grid coordinates.
//!
//! Every grid based puzzle (Keen, Bridges, the region map) addresses its cells
//! with a [`Position`] inside a [`GridSize`]. Positions are stored in row-major
//! order when flattened.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

/// A cell position on a grid.
///
/// `x` is the column and `y` is the row, both zero based.
/// Positions order row-major (by `y`, then by `x`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    // Field order gives row-major ordering.
    /// Row index.
    pub y: u8,
    /// Column index.
    pub x: u8,
}

impl Position {
    /// Creates a position from a column and a row.
    #[must_use]
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { y, x }
    }

    /// Returns `true` if both positions are on the same row.
    #[must_use]
    #[inline]
    pub fn same_row(self, other: Self) -> bool {
        self.y == other.y
    }

    /// Returns `true` if both positions are on the same column.
    #[must_use]
    #[inline]
    pub fn same_column(self, other: Self) -> bool {
        self.x == other.x
    }

    /// Returns the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Returns all positions strictly between `self` and `other`.
    ///
    /// Returns an empty iterator if the positions are not aligned on a row or column,
    /// or if they are adjacent.
    pub fn between(self, other: Self) -> impl Iterator<Item = Self> {
        let aligned = self.same_row(other) || self.same_column(other);
        let (lo, hi) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        let steps = if aligned {
            lo.manhattan_distance(hi).saturating_sub(1)
        } else {
            0
        };
        let horizontal = lo.same_row(hi);
        (1..=steps).map(move |i| {
            #[expect(clippy::cast_possible_truncation)]
            let i = i as u8;
            if horizontal {
                Self::new(lo.x + i, lo.y)
            } else {
                Self::new(lo.x, lo.y + i)
            }
        })
    }
}

/// One of the four orthogonal grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last column.
    Right,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
}

impl Direction {
    /// All four directions in clockwise order starting from [`Direction::Up`].
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the `(dx, dy)` unit offset of this direction.
    #[must_use]
    #[inline]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Returns `true` for [`Direction::Left`] and [`Direction::Right`].
    #[must_use]
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns the opposite direction.
    #[must_use]
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

/// Dimensions of a rectangular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns.
    pub width: u8,
    /// Number of rows.
    pub height: u8,
}

impl GridSize {
    /// Creates a grid size.
    #[must_use]
    #[inline]
    pub const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    /// Creates a square grid size.
    #[must_use]
    #[inline]
    pub const fn square(size: u8) -> Self {
        Self::new(size, size)
    }

    /// Returns the number of cells.
    #[must_use]
    #[inline]
    pub fn len(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns `true` if the grid has no cells.
    #[must_use]
    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[must_use]
    #[inline]
    pub fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Returns the row-major index of `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    #[inline]
    pub fn index_of(self, pos: Position) -> usize {
        assert!(self.contains(pos), "{pos:?} is outside {self:?}");
        usize::from(pos.y) * usize::from(self.width) + usize::from(pos.x)
    }

    /// Returns the position at row-major `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than [`GridSize::len`].
    #[must_use]
    #[inline]
    pub fn position_of(self, index: usize) -> Position {
        assert!(index < self.len(), "index {index} is outside {self:?}");
        let width = usize::from(self.width);
        #[expect(clippy::cast_possible_truncation)]
        let (x, y) = ((index % width) as u8, (index / width) as u8);
        Position::new(x, y)
    }

    /// Moves `distance` cells from `pos` in direction `dir`.
    ///
    /// Returns `None` if the destination is outside the grid.
    #[must_use]
    pub fn step(self, pos: Position, dir: Direction, distance: u8) -> Option<Position> {
        let (dx, dy) = dir.offset();
        let x = i16::from(pos.x) + i16::from(dx) * i16::from(distance);
        let y = i16::from(pos.y) + i16::from(dy) * i16::from(distance);
        let pos = Position::new(u8::try_from(x).ok()?, u8::try_from(y).ok()?);
        self.contains(pos).then_some(pos)
    }

    /// Returns the orthogonal neighbours of `pos` that lie inside the grid.
    pub fn neighbors(self, pos: Position) -> impl Iterator<Item = Position> {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(pos, dir, 1))
    }

    /// Returns an iterator over all positions in row-major order.
    #[must_use]
    pub fn positions(self) -> Positions {
        Positions {
            size: self,
            next: 0,
        }
    }
}

/// Row-major iterator over the positions of a [`GridSize`].
#[derive(Debug, Clone)]
pub struct Positions {
    size: GridSize,
    next: usize,
}

impl Iterator for Positions {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.size.len() {
            return None;
        }
        let pos = self.size.position_of(self.next);
        self.next += 1;
        Some(pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl FusedIterator for Positions {}
impl ExactSizeIterator for Positions {}
