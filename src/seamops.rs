// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam mutations
//!
//! Highlight, unhighlight, remove and add.  Each one checks the whole
//! seam against the current grid before it relinks a single row, so an
//! error means nothing changed.  Each one is undone by another:
//!
//! | operation   | inverse       |
//! |-------------|---------------|
//! | `highlight` | `unhighlight` |
//! | `remove`    | `add`         |
//!
//! Removed and replaced cells are never destroyed.  They keep their
//! old neighbor links, and the seam value handed back to the caller is
//! all that is needed to put them back.

use crate::cell::Cell;
use crate::errors::SeamError;
use crate::pixelgrid::PixelGrid;
use crate::seam::Seam;
use image::Rgb;
use log::debug;

fn check_length(grid: &PixelGrid, seam: &Seam) -> Result<(), SeamError> {
    let expected = grid.height() as usize;
    if seam.len() != expected {
        return Err(SeamError::SeamLength {
            expected,
            found: seam.len(),
        });
    }
    Ok(())
}

fn check_attached(grid: &PixelGrid, seam: &Seam) -> Result<(), SeamError> {
    check_length(grid, seam)?;
    seam.rows().try_for_each(|(row, id)| grid.check_attached(id, row))
}

/// Cover every cell of the seam with a new cell of `color`.  The
/// covered cells are handed back as a seam of their own; pass it to
/// `unhighlight` to uncover them.  Width does not change.
pub fn highlight(grid: &mut PixelGrid, seam: &Seam, color: Rgb<u8>) -> Result<Seam, SeamError> {
    check_attached(grid, seam)?;
    for (row, id) in seam.rows() {
        let overlay = grid.push_cell(Cell::new(color, row));
        grid.replace_cell_in_row(id, overlay);
    }
    debug!("highlighted seam of {} cells", seam.len());
    Ok(seam.clone())
}

/// Put back the cells a `highlight` covered, dropping the overlay.
/// Every slot must still hold the overlay that highlight put there;
/// if a later highlight covered it, that one must be undone first.
pub fn unhighlight(grid: &mut PixelGrid, original: &Seam) -> Result<(), SeamError> {
    check_length(grid, original)?;
    let overlays = original
        .rows()
        .map(|(row, id)| grid.check_replaced(id, row))
        .collect::<Result<Vec<_>, _>>()?;
    for (overlay, id) in overlays.into_iter().zip(original.cells()) {
        grid.replace_cell_in_row(overlay, *id);
    }
    debug!("restored highlighted seam of {} cells", original.len());
    Ok(())
}

/// Take one cell out of every row.  Width shrinks by one.
pub fn remove(grid: &mut PixelGrid, seam: &Seam) -> Result<(), SeamError> {
    let (width, height) = grid.dimensions();
    if width == 0 || height == 0 {
        return Err(SeamError::EmptyGrid { width, height });
    }
    check_attached(grid, seam)?;
    for id in seam.cells() {
        grid.detach_cell(*id);
    }
    grid.set_width(grid.width() - 1);
    debug!("removed seam, width now {}", grid.width());
    Ok(())
}

/// Put a removed seam back where it came from.  Width grows by one.
/// Fails with `StaleSeam` if a neighbor the seam remembers has since
/// left its row, or something else now sits between them.
pub fn add(grid: &mut PixelGrid, seam: &Seam) -> Result<(), SeamError> {
    check_length(grid, seam)?;
    seam.rows().try_for_each(|(row, id)| grid.check_gap(id, row))?;
    for id in seam.cells() {
        grid.reattach_cell(*id);
    }
    grid.set_width(grid.width() + 1);
    debug!("added seam, width now {}", grid.width());
    Ok(())
}
