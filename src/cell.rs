// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A single grid position.
//!
//! Cells never own their neighbors.  The `left` and `right` links are
//! handles into the grid's arena, and they form a doubly linked list
//! per row.  There are no up and down links: what is "above" a cell
//! is whatever sits at the same column of the previous row.

use image::Rgb;

/// A stable handle to a cell in a `PixelGrid`.  A detached cell keeps
/// its handle, so a retained seam can put it back later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32);

impl CellId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    /// The color of this cell, eight bits per channel.
    pub color: Rgb<u8>,
    /// Only meaningful after an energy pass, and stale after any seam
    /// is removed, added or highlighted.
    pub energy: f64,
    pub(crate) left: Option<CellId>,
    pub(crate) right: Option<CellId>,
    pub(crate) row: u32,
    pub(crate) attached: bool,
    // The overlay sitting in this cell's slot while it is highlighted.
    pub(crate) covered_by: Option<CellId>,
}

impl Cell {
    pub(crate) fn new(color: Rgb<u8>, row: u32) -> Self {
        Cell {
            color,
            energy: 0.0,
            left: None,
            right: None,
            row,
            attached: true,
            covered_by: None,
        }
    }

    /// The mean of the three color channels.
    pub fn brightness(&self) -> f64 {
        let [r, g, b] = self.color.0;
        (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
    }

    pub fn green(&self) -> f64 {
        f64::from(self.color.0[1])
    }

    pub fn left(&self) -> Option<CellId> {
        self.left
    }

    pub fn right(&self) -> Option<CellId> {
        self.right
    }

    /// The row this cell was created in.  Rows never move.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Whether the cell is currently reachable from its row head.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
