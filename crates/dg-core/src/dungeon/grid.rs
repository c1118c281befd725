//! The generation substrate: a `width x height` array of cell kinds
//!
//! Writes outside the grid are silently ignored; reads outside return `None`.
//! The parallel room-id layer is only allocated once a room id is written.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::CellKind;
use super::rect::{Pos, Rect};
use super::room::RoomId;

/// 2D grid of cell kinds plus the per-cell room id layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    kinds: Vec<CellKind>,
    room_ids: Option<Vec<Option<RoomId>>>,
}

impl Grid {
    /// Create a grid filled with `Wall`. Negative sizes are treated as zero,
    /// and so is a size whose cell count overflows `i32`.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = match width.max(0).checked_mul(height.max(0)) {
            Some(_) => (width.max(0), height.max(0)),
            None => (0, 0),
        };
        Self {
            width,
            height,
            kinds: vec![CellKind::Wall; (width * height) as usize],
            room_ids: None,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The whole grid as a rectangle
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width - 1, self.height - 1)
    }

    pub const fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn idx(&self, p: Pos) -> Option<usize> {
        if self.in_bounds(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    pub fn kind(&self, p: Pos) -> Option<CellKind> {
        self.idx(p).map(|i| self.kinds[i])
    }

    /// Kind at `p`, treating out-of-bounds cells as `Wall`
    pub fn kind_or_wall(&self, p: Pos) -> CellKind {
        self.kind(p).unwrap_or(CellKind::Wall)
    }

    pub fn set_kind(&mut self, p: Pos, kind: CellKind) {
        if let Some(i) = self.idx(p) {
            self.kinds[i] = kind;
        }
    }

    /// Set every cell of `rect` to `kind`, clipped to the grid
    pub fn carve_room(&mut self, rect: &Rect, kind: CellKind) {
        let Some(clipped) = rect.intersection(&self.bounds()) else {
            return;
        };
        for p in clipped.cells() {
            self.set_kind(p, kind);
        }
    }

    /// True iff every cell of `rect` expanded by `margin` is inside the grid
    /// and still `Wall`
    pub fn is_rect_clear_with_margin(&self, rect: &Rect, margin: i32) -> bool {
        let area = rect.expand(margin);
        if !area.is_valid() || !self.bounds().contains(&area) {
            return false;
        }
        area.cells().all(|p| self.kind_or_wall(p).is_wall())
    }

    pub fn room_id(&self, p: Pos) -> Option<RoomId> {
        let i = self.idx(p)?;
        self.room_ids.as_ref().and_then(|ids| ids[i])
    }

    pub fn set_room_id(&mut self, p: Pos, id: Option<RoomId>) {
        let Some(i) = self.idx(p) else {
            return;
        };
        if id.is_none() && self.room_ids.is_none() {
            return;
        }
        let len = self.kinds.len();
        let ids = self.room_ids.get_or_insert_with(|| vec![None; len]);
        ids[i] = id;
    }

    /// Forget every room id (the layer is dropped, not just zeroed)
    pub fn clear_room_ids(&mut self) {
        self.room_ids = None;
    }

    pub fn has_room_ids(&self) -> bool {
        self.room_ids.is_some()
    }

    /// Every cell position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        self.bounds().cells()
    }

    /// Count cells whose kind satisfies `pred`
    pub fn count(&self, pred: impl Fn(CellKind) -> bool) -> usize {
        self.kinds.iter().filter(|k| pred(**k)).count()
    }

    /// In-bounds orthogonal neighbours in `+x, -x, +y, -y` order
    pub fn neighbors4(&self, p: Pos) -> impl Iterator<Item = (Pos, CellKind)> + '_ {
        p.neighbors4()
            .into_iter()
            .filter_map(move |n| self.kind(n).map(|k| (n, k)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.kind_or_wall(Pos::new(x, y)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
