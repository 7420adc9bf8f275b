// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The mutable pixel grid
//!
//! An image held as one doubly linked list per row.  All cells live in
//! a single arena and link to each other by `CellId`, so taking a cell
//! out of a row, or putting it back, touches only its two neighbors.
//! Nothing is ever freed: a cell that leaves its row stays in the
//! arena, with its old links intact, for as long as the grid lives.
//! That is what makes a removed seam restorable.
//!
//! The arena therefore only grows.  Removing a seam costs nothing, but
//! every highlight adds one overlay cell per row, and those cells stay
//! behind after the highlight is undone.  Slots are not recycled: a
//! handle that once named an overlay must never come to name some
//! other cell, or a stale seam could pass validation.  A long session
//! that highlights often pays `height` cells per highlight; start a
//! fresh grid from `to_image` to compact it.
//!
//! Vertical adjacency is never stored.  The cell "above" column `x`
//! of row `y` is the `x`th cell of row `y - 1`, found by walking.

use crate::cell::{Cell, CellId};
use crate::errors::SeamError;
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use std::ops::Index;

/// A grid of `height` rows, each exactly `width` cells long.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    cells: Vec<Cell>,
    rows: Vec<Option<CellId>>,
    width: u32,
}

/// Walks one row from its head via the `right` links.
pub struct Row<'a> {
    grid: &'a PixelGrid,
    next: Option<CellId>,
}

impl<'a> Iterator for Row<'a> {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        let current = self.next?;
        self.next = self.grid.cells[current.index()].right;
        Some(current)
    }
}

impl PixelGrid {
    /// Build a grid from a row-major sequence of colors.  The source
    /// must yield exactly `width * height` colors.
    pub fn new<I>(width: u32, height: u32, pixels: I) -> Result<Self, SeamError>
    where
        I: IntoIterator<Item = Rgb<u8>>,
    {
        let expected = width as usize * height as usize;
        let mut source = pixels.into_iter();
        let mut cells: Vec<Cell> = Vec::with_capacity(expected);
        let mut rows = vec![None; height as usize];

        for y in 0..height {
            let mut previous: Option<CellId> = None;
            for _ in 0..width {
                let found = cells.len();
                let color = source
                    .next()
                    .ok_or(SeamError::Construction { expected, found })?;
                let id = CellId(found as u32);
                let mut cell = Cell::new(color, y);
                cell.left = previous;
                match previous {
                    Some(p) => cells[p.index()].right = Some(id),
                    None => rows[y as usize] = Some(id),
                }
                cells.push(cell);
                previous = Some(id);
            }
        }

        let surplus = source.count();
        if surplus > 0 {
            return Err(SeamError::Construction {
                expected,
                found: expected + surplus,
            });
        }

        Ok(PixelGrid { cells, rows, width })
    }

    /// Build a grid from any decoded image.  Wider channels, alpha and
    /// gray are brought down to 8-bit RGB by the image crate, which
    /// rescales rather than truncates: a 16-bit 65535 and a float 1.0
    /// both become 255.
    pub fn from_image(image: &DynamicImage) -> Result<Self, SeamError> {
        PixelGrid::from_rgb8(&image.to_rgb8())
    }

    pub fn from_rgb8(image: &RgbImage) -> Result<Self, SeamError> {
        let (width, height) = image.dimensions();
        PixelGrid::new(width, height, image.pixels().copied())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height())
    }

    /// The first cell of row `r`, or None if the row is empty or does
    /// not exist.
    pub fn row_head(&self, r: u32) -> Option<CellId> {
        self.rows.get(r as usize).copied().flatten()
    }

    pub fn cell_right(&self, id: CellId) -> Option<CellId> {
        self.get(id).and_then(|c| c.right)
    }

    pub fn cell_left(&self, id: CellId) -> Option<CellId> {
        self.get(id).and_then(|c| c.left)
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    /// Iterate the cells of row `r`, left to right.
    pub fn row(&self, r: u32) -> Row<'_> {
        Row {
            grid: self,
            next: self.row_head(r),
        }
    }

    /// The current column of an attached cell.  O(width).
    pub fn column_of(&self, id: CellId) -> Option<u32> {
        let cell = self.get(id).filter(|c| c.attached)?;
        let mut column = 0;
        let mut left = cell.left;
        while let Some(l) = left {
            column += 1;
            left = self.cells[l.index()].left;
        }
        Some(column)
    }

    /// Row-major colors, `width * height` of them.
    pub fn to_color_sequence(&self) -> Vec<Rgb<u8>> {
        (0..self.height())
            .flat_map(|y| self.row(y))
            .map(|id| self[id].color)
            .collect()
    }

    pub fn to_image(&self) -> RgbImage {
        let mut out = ImageBuffer::new(self.width, self.height());
        for y in 0..self.height() {
            for (x, id) in self.row(y).enumerate() {
                out.put_pixel(x as u32, y, self[id].color);
            }
        }
        out
    }

    /// True when every row holds exactly `width` cells, every link is
    /// mirrored by its neighbor, and nothing cycles.
    pub fn is_consistent(&self) -> bool {
        (0..self.height()).all(|y| {
            let mut count = 0u32;
            let mut left = None;
            let mut current = self.row_head(y);
            while let Some(id) = current {
                let cell = &self.cells[id.index()];
                if count > self.width || !cell.attached || cell.row != y || cell.left != left {
                    return false;
                }
                count += 1;
                left = current;
                current = cell.right;
            }
            count == self.width
        })
    }

    // Everything below is the raw linked-list surgery.  None of it
    // validates; the seam operations check a whole seam before they
    // touch any row, so that a failure leaves the grid alone.

    pub(crate) fn push_cell(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.cells.len() as u32);
        self.cells.push(cell);
        id
    }

    pub(crate) fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    // Point `left` (or the row head) and `right` at `id`.
    fn link(&mut self, left: Option<CellId>, id: CellId, right: Option<CellId>, row: u32) {
        match left {
            Some(l) => self.cells[l.index()].right = Some(id),
            None => self.rows[row as usize] = Some(id),
        }
        if let Some(r) = right {
            self.cells[r.index()].left = Some(id);
        }
    }

    /// Splice `new` into the slot `old` occupies.  `old` keeps its
    /// links, and remembers `new` as the cell covering it, but is no
    /// longer reachable from the row.
    pub(crate) fn replace_cell_in_row(&mut self, old: CellId, new: CellId) {
        let (left, right, row) = {
            let cell = &self.cells[old.index()];
            (cell.left, cell.right, cell.row)
        };
        {
            let cell = &mut self.cells[new.index()];
            cell.left = left;
            cell.right = right;
            cell.row = row;
            cell.attached = true;
            cell.covered_by = None;
        }
        self.link(left, new, right, row);
        let cell = &mut self.cells[old.index()];
        cell.attached = false;
        cell.covered_by = Some(new);
    }

    /// Unlink a cell from its row.  The width is not touched; seam
    /// removal adjusts it once per pass.
    pub(crate) fn detach_cell(&mut self, id: CellId) {
        let (left, right, row) = {
            let cell = &self.cells[id.index()];
            (cell.left, cell.right, cell.row)
        };
        match left {
            Some(l) => self.cells[l.index()].right = right,
            None => self.rows[row as usize] = right,
        }
        if let Some(r) = right {
            self.cells[r.index()].left = left;
        }
        self.cells[id.index()].attached = false;
    }

    /// Relink a detached cell between the neighbors it remembers.
    pub(crate) fn reattach_cell(&mut self, id: CellId) {
        let (left, right, row) = {
            let cell = &self.cells[id.index()];
            (cell.left, cell.right, cell.row)
        };
        self.link(left, id, right, row);
        self.cells[id.index()].attached = true;
    }

    // Validation used by the seam operations.

    fn attached_in_row(&self, id: CellId, row: u32) -> bool {
        self.get(id).map_or(false, |c| c.attached && c.row == row)
    }

    // Whatever currently follows `left` in `row`; the head if `left`
    // is None.
    fn successor(&self, left: Option<CellId>, row: u32) -> Option<CellId> {
        match left {
            Some(l) => self.cells[l.index()].right,
            None => self.row_head(row),
        }
    }

    // A detached cell of `row` whose remembered neighbors are both
    // still live in that row.
    fn detached_with_live_neighbors(&self, id: CellId, row: u32) -> Option<&Cell> {
        let cell = self.get(id).filter(|c| !c.attached && c.row == row)?;
        let live = |n: Option<CellId>| n.map_or(true, |n| self.attached_in_row(n, row));
        if live(cell.left) && live(cell.right) {
            Some(cell)
        } else {
            None
        }
    }

    pub(crate) fn check_attached(&self, id: CellId, row: u32) -> Result<(), SeamError> {
        if self.attached_in_row(id, row) {
            Ok(())
        } else {
            Err(SeamError::StaleSeam { row })
        }
    }

    /// A detached cell can be reattached only if its two neighbors are
    /// still adjacent to each other.
    pub(crate) fn check_gap(&self, id: CellId, row: u32) -> Result<(), SeamError> {
        match self.detached_with_live_neighbors(id, row) {
            Some(cell) if self.successor(cell.left, row) == cell.right => Ok(()),
            _ => Err(SeamError::StaleSeam { row }),
        }
    }

    /// A detached cell can be swapped back in only if the very cell
    /// that replaced it still sits alone between its neighbors.
    /// Returns that occupant.
    pub(crate) fn check_replaced(&self, id: CellId, row: u32) -> Result<CellId, SeamError> {
        let stale = SeamError::StaleSeam { row };
        let cell = self
            .detached_with_live_neighbors(id, row)
            .ok_or_else(|| stale.clone())?;
        let occupant = self.successor(cell.left, row).ok_or_else(|| stale.clone())?;
        let current = &self.cells[occupant.index()];
        if cell.covered_by != Some(occupant)
            || current.left != cell.left
            || current.right != cell.right
        {
            return Err(stale);
        }
        Ok(occupant)
    }
}

impl Index<CellId> for PixelGrid {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }
}

/// Gray test grids: each level becomes an (l, l, l) cell.
#[cfg(test)]
pub(crate) fn gray_grid(width: u32, height: u32, levels: &[u8]) -> PixelGrid {
    PixelGrid::new(width, height, levels.iter().map(|l| Rgb([*l, *l, *l]))).unwrap()
}
