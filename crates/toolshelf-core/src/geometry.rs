#![forbid(unsafe_code)]

//! Geometric primitives for token placement and pointer hit testing.
//!
//! All coordinates are cells (0-indexed, origin at top-left), matching the
//! units the host reports pointer positions in.

use serde::{Deserialize, Serialize};

/// A pointer position in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        (i32::from(self.x) - i32::from(other.x)).unsigned_abs()
            + (i32::from(self.y) - i32::from(other.y)).unsigned_abs()
    }

    /// Coordinate along the main axis of `orientation`.
    #[must_use]
    pub const fn main(self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Coordinate across the main axis of `orientation`.
    #[must_use]
    pub const fn cross(self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }
}

impl From<(u16, u16)> for Position {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rendered token or slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if the size has zero area.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Layout direction of a collection.
///
/// Horizontal collections fill rows left to right; vertical collections fill
/// columns top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A rectangle for slot bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin(origin: Position, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    /// Start coordinate along the main axis.
    #[inline]
    pub const fn main_start(&self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Extent along the main axis.
    #[inline]
    pub const fn main_extent(&self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Start coordinate across the main axis.
    #[inline]
    pub const fn cross_start(&self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    /// Extent across the main axis.
    #[inline]
    pub const fn cross_extent(&self, orientation: Orientation) -> u16 {
        match orientation {
            Orientation::Horizontal => self.height,
            Orientation::Vertical => self.width,
        }
    }

    /// Midpoint along the main axis (rounded down).
    #[inline]
    pub const fn main_mid(&self, orientation: Orientation) -> u16 {
        self.main_start(orientation)
            .saturating_add(self.main_extent(orientation) / 2)
    }

    /// Trailing edge across the main axis (exclusive).
    #[inline]
    pub const fn cross_end(&self, orientation: Orientation) -> u16 {
        self.cross_start(orientation)
            .saturating_add(self.cross_extent(orientation))
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(Position::new(2, 3)));
        assert!(r.contains(Position::new(5, 4)));
        assert!(!r.contains(Position::new(6, 4)));
        assert!(!r.contains(Position::new(5, 5)));
    }

    #[test]
    fn axis_accessors_swap_with_orientation() {
        let r = Rect::new(1, 10, 6, 3);
        assert_eq!(r.main_start(Orientation::Horizontal), 1);
        assert_eq!(r.main_start(Orientation::Vertical), 10);
        assert_eq!(r.cross_end(Orientation::Horizontal), 13);
        assert_eq!(r.cross_end(Orientation::Vertical), 7);
        assert_eq!(r.main_mid(Orientation::Horizontal), 4);
    }

    #[test]
    fn union_ignores_empty() {
        let a = Rect::new(0, 0, 0, 0);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.union(&b), b);
        assert_eq!(b.union(&Rect::new(0, 0, 1, 1)), Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Position::new(3, 9);
        let b = Position::new(7, 2);
        assert_eq!(a.manhattan_distance(b), 11);
        assert_eq!(b.manhattan_distance(a), 11);
    }
}
