// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A top-to-bottom path of cells, one per row.

use crate::cell::CellId;
use crate::pixelgrid::PixelGrid;
use itertools::Itertools;

/// An ordered list of cell handles, row 0 first.  Seams are plain
/// values: holding one is what lets a removed or highlighted seam be
/// put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    cells: Vec<CellId>,
}

impl Seam {
    pub fn new(cells: Vec<CellId>) -> Self {
        Seam { cells }
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The (row, cell) pairs of the seam, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = (u32, CellId)> + '_ {
        self.cells.iter().enumerate().map(|(r, id)| (r as u32, *id))
    }

    /// Current column of every cell, or None if any of them is no
    /// longer in the grid.
    pub fn columns(&self, grid: &PixelGrid) -> Option<Vec<u32>> {
        self.cells.iter().map(|id| grid.column_of(*id)).collect()
    }

    /// Whether successive rows' cells are at most one column apart.
    pub fn is_connected(&self, grid: &PixelGrid) -> bool {
        self.columns(grid).map_or(false, |columns| {
            columns
                .iter()
                .tuple_windows()
                .all(|(a, b)| (i64::from(*a) - i64::from(*b)).abs() <= 1)
        })
    }
}
