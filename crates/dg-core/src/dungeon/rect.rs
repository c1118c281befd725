//! Grid geometry: cell positions, growth directions and rectangles
//!
//! All rectangles are inclusive on both ends, matching how rooms are carved:
//! a room from `lx..=hx` by `ly..=hy` is `hx - lx + 1` cells wide.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position one cell away in the given direction
    pub const fn step(self, dir: Dir) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Position `n` cells away in the given direction
    pub const fn offset(self, dir: Dir, n: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx * n, self.y + dy * n)
    }

    /// The four orthogonal neighbours, in the fixed order `+x, -x, +y, -y`
    pub const fn neighbors4(self) -> [Pos; 4] {
        [
            Self::new(self.x + 1, self.y),
            Self::new(self.x - 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x, self.y - 1),
        ]
    }

    pub const fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Growth direction (unit vector). `Up` is towards smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Dir::Up | Dir::Down)
    }
}

/// An axis-aligned, inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left x coordinate
    pub lx: i32,
    /// Top y coordinate
    pub ly: i32,
    /// Right x coordinate
    pub hx: i32,
    /// Bottom y coordinate
    pub hy: i32,
}

impl Rect {
    /// Create a new rectangle from its corners
    pub const fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Create a rectangle from its top-left corner and size
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Create a `width x height` rectangle around a center cell
    ///
    /// For even sizes the extra cell goes to the left/top.
    pub const fn centered(center: Pos, width: i32, height: i32) -> Self {
        Self::from_size(center.x - width / 2, center.y - height / 2, width, height)
    }

    /// Get the width of the rectangle
    pub const fn width(&self) -> i32 {
        if self.hx >= self.lx { self.hx - self.lx + 1 } else { 0 }
    }

    /// Get the height of the rectangle
    pub const fn height(&self) -> i32 {
        if self.hy >= self.ly { self.hy - self.ly + 1 } else { 0 }
    }

    pub const fn area(&self) -> i32 {
        self.width() * self.height()
    }

    /// Integer midpoint
    pub const fn center(&self) -> Pos {
        Pos::new((self.lx + self.hx) / 2, (self.ly + self.hy) / 2)
    }

    /// Check if the rectangle is valid (has positive area)
    pub const fn is_valid(&self) -> bool {
        self.hx >= self.lx && self.hy >= self.ly
    }

    /// Check if this rectangle contains another
    pub const fn contains(&self, other: &Rect) -> bool {
        self.lx <= other.lx && self.hx >= other.hx && self.ly <= other.ly && self.hy >= other.hy
    }

    pub const fn contains_pos(&self, p: Pos) -> bool {
        p.x >= self.lx && p.x <= self.hx && p.y >= self.ly && p.y <= self.hy
    }

    /// Check if this rectangle intersects another
    pub const fn intersects(&self, other: &Rect) -> bool {
        !(self.hx < other.lx || self.lx > other.hx || self.hy < other.ly || self.ly > other.hy)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect {
            lx: self.lx.max(other.lx),
            ly: self.ly.max(other.ly),
            hx: self.hx.min(other.hx),
            hy: self.hy.min(other.hy),
        })
    }

    /// Grow (or shrink, for negative margins) on every side
    pub const fn expand(&self, margin: i32) -> Rect {
        Rect::new(self.lx - margin, self.ly - margin, self.hx + margin, self.hy + margin)
    }

    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.lx + dx, self.ly + dy, self.hx + dx, self.hy + dy)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let Rect { lx, ly, hx, hy } = *self;
        (ly..=hy).flat_map(move |y| (lx..=hx).map(move |x| Pos::new(x, y)))
    }

    /// Cells immediately outside the rectangle, corners included,
    /// clockwise from the top-left
    pub fn outer_ring(&self) -> Vec<Pos> {
        let r = self.expand(1);
        if !self.is_valid() {
            return Vec::new();
        }
        let mut ring = Vec::with_capacity(2 * (r.width() + r.height()) as usize);
        for x in r.lx..=r.hx {
            ring.push(Pos::new(x, r.ly));
        }
        for y in r.ly + 1..=r.hy {
            ring.push(Pos::new(r.hx, y));
        }
        for x in (r.lx..r.hx).rev() {
            ring.push(Pos::new(x, r.hy));
        }
        for y in (r.ly + 1..r.hy).rev() {
            ring.push(Pos::new(r.lx, y));
        }
        ring
    }

    /// Cells on the given edge of the rectangle (inside it)
    pub fn edge_cells(&self, side: Dir) -> Vec<Pos> {
        match side {
            Dir::Up => (self.lx..=self.hx).map(|x| Pos::new(x, self.ly)).collect(),
            Dir::Down => (self.lx..=self.hx).map(|x| Pos::new(x, self.hy)).collect(),
            Dir::Left => (self.ly..=self.hy).map(|y| Pos::new(self.lx, y)).collect(),
            Dir::Right => (self.ly..=self.hy).map(|y| Pos::new(self.hx, y)).collect(),
        }
    }

    /// Distance from a cell inside the rect to the nearest side (0 on the edge)
    pub fn inset_of(&self, p: Pos) -> i32 {
        (p.x - self.lx).min(self.hx - p.x).min(p.y - self.ly).min(self.hy - p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10, 20, 15, 25);
        assert_eq!(r.width(), 6);
        assert_eq!(r.height(), 6);
        assert_eq!(r.area(), 36);
        assert_eq!(Rect::new(5, 5, 4, 4).width(), 0);
    }

    #[test]
    fn test_rect_from_size_and_centered() {
        let r = Rect::from_size(2, 3, 4, 5);
        assert_eq!(r, Rect::new(2, 3, 5, 7));

        let c = Rect::centered(Pos::new(10, 10), 5, 4);
        assert_eq!(c.width(), 5);
        assert_eq!(c.height(), 4);
        assert!(c.contains_pos(Pos::new(10, 10)));
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(0, 0, 20, 20);
        let inner = Rect::new(5, 5, 10, 10);
        let outside = Rect::new(25, 25, 30, 30);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&outside));
    }

    #[test]
    fn test_rect_intersects() {
        let r1 = Rect::new(0, 0, 10, 10);
        let r2 = Rect::new(5, 5, 15, 15);
        let r3 = Rect::new(20, 20, 30, 30);
        let touching = Rect::new(10, 0, 12, 3);

        assert!(r1.intersects(&r2));
        assert!(r2.intersects(&r1));
        assert!(!r1.intersects(&r3));
        assert!(r1.intersects(&touching));
    }

    #[test]
    fn test_rect_intersection() {
        let r1 = Rect::new(0, 0, 10, 10);
        let r2 = Rect::new(5, 5, 15, 15);

        assert_eq!(r1.intersection(&r2), Some(Rect::new(5, 5, 10, 10)));
        assert_eq!(r1.intersection(&Rect::new(11, 11, 12, 12)), None);
    }

    #[test]
    fn test_cells_row_major() {
        let cells: Vec<_> = Rect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![Pos::new(1, 1), Pos::new(2, 1), Pos::new(1, 2), Pos::new(2, 2)]
        );
    }

    #[test]
    fn test_outer_ring() {
        let r = Rect::new(2, 2, 4, 3);
        let ring = r.outer_ring();
        // (3 + 2) * 2 + (2 * 2) perimeter of a 5x4 box
        assert_eq!(ring.len(), 14);
        assert!(ring.iter().all(|p| !r.contains_pos(*p)));
        assert!(ring.iter().all(|p| r.expand(1).contains_pos(*p)));
        let unique: std::collections::BTreeSet<_> = ring.iter().collect();
        assert_eq!(unique.len(), ring.len());
    }

    #[test]
    fn test_inset_and_edges() {
        let r = Rect::new(0, 0, 6, 4);
        assert_eq!(r.inset_of(Pos::new(0, 2)), 0);
        assert_eq!(r.inset_of(Pos::new(3, 2)), 2);
        assert_eq!(r.edge_cells(Dir::Up).len(), 7);
        assert_eq!(r.edge_cells(Dir::Left).len(), 5);
        assert!(r.edge_cells(Dir::Down).iter().all(|p| p.y == 4));
    }

    #[test]
    fn test_dir_helpers() {
        assert_eq!(Pos::new(3, 3).step(Dir::Up), Pos::new(3, 2));
        assert_eq!(Pos::new(3, 3).offset(Dir::Right, 4), Pos::new(7, 3));
        assert_eq!(Dir::Left.opposite(), Dir::Right);
        assert!(Dir::Down.is_vertical());
        assert_eq!(
            Pos::new(0, 0).neighbors4(),
            [Pos::new(1, 0), Pos::new(-1, 0), Pos::new(0, 1), Pos::new(0, -1)]
        );
        assert_eq!(Pos::new(1, 1).manhattan(Pos::new(4, -1)), 5);
    }
}
