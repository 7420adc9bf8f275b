// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Everything that can go wrong while building, searching, or
//! mutating a grid.  Boundary conditions in the energy pass are not
//! errors; they have a fallback (see `energy`).

use failure::Fail;

/// The one error type of the library.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum SeamError {
    /// The pixel source did not yield exactly width × height colors.
    #[fail(
        display = "pixel source yielded {} colors, expected {}",
        found, expected
    )]
    Construction { expected: usize, found: usize },

    /// Seams cannot be found in a grid with no rows or no columns.
    #[fail(display = "cannot find a seam in a {}x{} grid", width, height)]
    EmptyGrid { width: u32, height: u32 },

    /// A seam must have exactly one cell per row.
    #[fail(display = "seam has {} cells, grid has {} rows", found, expected)]
    SeamLength { expected: usize, found: usize },

    /// The seam's cell for this row no longer fits the row it came from.
    #[fail(display = "seam is stale at row {}", row)]
    StaleSeam { row: u32 },

    /// The editor will not carve an image this narrow.
    #[fail(display = "image width {} is not wide enough for more operations", width)]
    TooNarrow { width: u32 },
}
