// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a grid
//!
//! Every interior cell gets the magnitude of a Sobel-style gradient
//! over brightness: a 1-2-1 kernel across the left and right columns
//! for the horizontal component, and across the rows above and below
//! for the vertical one.
//!
//! Cells on the border (first or last row, or no neighbor to one
//! side) have no symmetric neighborhood, so their energy is simply
//! their brightness.
//!
//! The pass is read-then-write: every row's energies are computed from
//! colors alone, and only then written back.  That makes the read
//! phase trivially parallel, which the `threaded` feature exploits.

use crate::cell::CellId;
use crate::pixelgrid::PixelGrid;
use log::debug;

// (left, self, right) brightness of a cell that has both neighbors.
fn kernel_row(grid: &PixelGrid, id: CellId) -> Option<(f64, f64, f64)> {
    let cell = &grid[id];
    let (left, right) = (cell.left()?, cell.right()?);
    Some((
        grid[left].brightness(),
        cell.brightness(),
        grid[right].brightness(),
    ))
}

//   horizontal = (AL + 2L + BL) - (AR + 2R + BR)
//   vertical   = (AL + 2A + AR) - (BL + 2B + BR)
//   energy     = sqrt(horizontal² + vertical²)
fn gradient_energy(grid: &PixelGrid, above: CellId, current: CellId, below: CellId) -> f64 {
    match (
        kernel_row(grid, above),
        kernel_row(grid, current),
        kernel_row(grid, below),
    ) {
        (Some(a), Some(c), Some(b)) => {
            let horizontal = (a.0 + 2.0 * c.0 + b.0) - (a.2 + 2.0 * c.2 + b.2);
            let vertical = (a.0 + 2.0 * a.1 + a.2) - (b.0 + 2.0 * b.1 + b.2);
            (horizontal * horizontal + vertical * vertical).sqrt()
        }
        _ => grid[current].brightness(),
    }
}

/// The energies of row `y`, left to right, without writing them.
pub(crate) fn row_energy(grid: &PixelGrid, y: u32) -> Vec<f64> {
    if y == 0 || y >= grid.height().saturating_sub(1) {
        return grid.row(y).map(|id| grid[id].brightness()).collect();
    }
    grid.row(y)
        .zip(grid.row(y - 1))
        .zip(grid.row(y + 1))
        .map(|((current, above), below)| gradient_energy(grid, above, current, below))
        .collect()
}

#[cfg(not(feature = "threaded"))]
fn energy_rows(grid: &PixelGrid) -> Vec<Vec<f64>> {
    (0..grid.height()).map(|y| row_energy(grid, y)).collect()
}

// Each worker owns a contiguous band of output rows and only reads the
// grid, so nothing is shared mutably until the sequential write.
#[cfg(feature = "threaded")]
fn energy_rows(grid: &PixelGrid) -> Vec<Vec<f64>> {
    let height = grid.height() as usize;
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); height];
    if height == 0 {
        return rows;
    }
    let workers = num_cpus::get().max(1);
    let band = (height + workers - 1) / workers;
    crossbeam::scope(|s| {
        for (i, chunk) in rows.chunks_mut(band).enumerate() {
            s.spawn(move |_| {
                for (j, row) in chunk.iter_mut().enumerate() {
                    *row = row_energy(grid, (i * band + j) as u32);
                }
            });
        }
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e));
    rows
}

/// Compute and store the energy of every cell in the grid.  Nothing
/// calls this automatically; run it before any search that values
/// cells by energy.
pub fn calculate_energy(grid: &mut PixelGrid) {
    let rows = energy_rows(grid);
    for (y, energies) in rows.into_iter().enumerate() {
        let ids: Vec<CellId> = grid.row(y as u32).collect();
        for (id, energy) in ids.into_iter().zip(energies) {
            grid.cell_mut(id).energy = energy;
        }
    }
    debug!("energy pass over {}x{} grid", grid.width(), grid.height());
}
