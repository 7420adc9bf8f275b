// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the seam with the greatest cumulative value
//!
//! Plain dynamic programming over rows.  For every cell, the best
//! path ending there is its own value plus the best of the three
//! paths ending diagonally-left, directly, and diagonally-right above
//! it.  Ties go left: the upper-left candidate beats the one straight
//! above, which beats the upper-right.  In the last row, the leftmost
//! of equal maxima wins.  Both rules matter for reproducible output
//! on flat images.
//!
//! Minimizing is maximizing the negation, which is how the lowest
//! energy seam is found.

use crate::cell::{Cell, CellId};
use crate::cq;
use crate::errors::SeamError;
use crate::pixelgrid::PixelGrid;
use crate::seam::Seam;
use crate::twodmap::{TwoDimensionalMap, ValueAndBackPointer};
use image::Rgb;
use log::debug;

/// A found seam together with its cumulative value.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamSearch {
    pub seam: Seam,
    pub value: f64,
}

/// The two standard ways to value a cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Valuation {
    /// Maximize the green channel.
    Greenest,
    /// Minimize energy.  The energy pass must have run.
    LowestEnergy,
}

impl Valuation {
    pub fn value(self, cell: &Cell) -> f64 {
        match self {
            Valuation::Greenest => cell.green(),
            Valuation::LowestEnergy => -cell.energy,
        }
    }

    /// The color used to mark a seam found this way.
    pub fn overlay_color(self) -> Rgb<u8> {
        match self {
            Valuation::Greenest => Rgb([0, 255, 0]),
            Valuation::LowestEnergy => Rgb([255, 0, 0]),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Valuation::Greenest => "greenest",
            Valuation::LowestEnergy => "lowest energy",
        }
    }
}

// The implicit vertical adjacency has to be made explicit somewhere;
// one walk per row up front keeps the rest O(1) per cell.
fn collect_rows(grid: &PixelGrid) -> Vec<Vec<CellId>> {
    (0..grid.height()).map(|y| grid.row(y).collect()).collect()
}

// Of the clamped columns above `x`, the leftmost of the largest.
fn best_parent(target: &TwoDimensionalMap<ValueAndBackPointer>, x: u32, y: u32) -> u32 {
    let maxwidth = target.width - 1;
    let range = cq!(x == 0, 0, x - 1)..=cq!(x == maxwidth, maxwidth, x + 1);
    range.fold(cq!(x == 0, 0, x - 1), |best, candidate| {
        if target[(candidate, y - 1)].value > target[(best, y - 1)].value {
            candidate
        } else {
            best
        }
    })
}

/// Find the seam maximizing the sum of `valuation` over its cells, and
/// report that sum.
pub fn search<F>(grid: &PixelGrid, valuation: F) -> Result<SeamSearch, SeamError>
where
    F: Fn(&Cell) -> f64,
{
    let (width, height) = grid.dimensions();
    if width == 0 || height == 0 {
        return Err(SeamError::EmptyGrid { width, height });
    }

    let rows = collect_rows(grid);
    debug_assert!(rows.iter().all(|row| row.len() == width as usize));

    let mut target: TwoDimensionalMap<ValueAndBackPointer> = TwoDimensionalMap::new(width, height);

    // Populate the first row with their native values.
    for (x, id) in rows[0].iter().enumerate() {
        target[(x as u32, 0)] = ValueAndBackPointer {
            value: valuation(&grid[*id]),
            parent: x as u32,
        };
    }

    for y in 1..height {
        for (x, id) in rows[y as usize].iter().enumerate() {
            let x = x as u32;
            let parent = best_parent(&target, x, y);
            target[(x, y)] = ValueAndBackPointer {
                value: valuation(&grid[*id]) + target[(parent, y - 1)].value,
                parent,
            };
        }
    }

    let bottom = height - 1;
    let mut seam_col = (0..width).fold(0, |best, x| {
        cq!(
            target[(x, bottom)].value > target[(best, bottom)].value,
            x,
            best
        )
    });
    let value = target[(seam_col, bottom)].value;

    // Working backwards, collect the cells of the seam, then reverse.
    let cells: Vec<CellId> = (0..height)
        .rev()
        .fold(Vec::with_capacity(height as usize), |mut acc, y| {
            acc.push(rows[y as usize][seam_col as usize]);
            seam_col = target[(seam_col, y)].parent;
            acc
        })
        .into_iter()
        .rev()
        .collect();

    debug!("found seam of value {} in {}x{} grid", value, width, height);
    Ok(SeamSearch {
        seam: Seam::new(cells),
        value,
    })
}

/// Find the seam maximizing the sum of `valuation` over its cells.
pub fn find_maximizing_seam<F>(grid: &PixelGrid, valuation: F) -> Result<Seam, SeamError>
where
    F: Fn(&Cell) -> f64,
{
    search(grid, valuation).map(|found| found.seam)
}

pub fn greenest_seam(grid: &PixelGrid) -> Result<Seam, SeamError> {
    find_maximizing_seam(grid, |cell| Valuation::Greenest.value(cell))
}

/// The seam of least total energy, using whatever energies the cells
/// currently hold.
pub fn lowest_energy_seam(grid: &PixelGrid) -> Result<Seam, SeamError> {
    find_maximizing_seam(grid, |cell| Valuation::LowestEnergy.value(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::calculate_energy;
    use crate::pixelgrid::gray_grid;

    fn green_column_grid() -> PixelGrid {
        let colors = (0..9).map(|i| cq!(i % 3 == 1, Rgb([0, 255, 0]), Rgb([0, 0, 0])));
        PixelGrid::new(3, 3, colors).unwrap()
    }

    // A deterministic, irregular grid without pulling in a random
    // number generator.
    fn noisy_grid(width: u32, height: u32) -> PixelGrid {
        let mut state: u32 = 0x2545_f491;
        let colors = (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let [r, g, b, _] = state.to_le_bytes();
                Rgb([r, g, b])
            })
            .collect::<Vec<_>>();
        PixelGrid::new(width, height, colors).unwrap()
    }

    #[test]
    fn greenest_seam_follows_green_column() {
        let grid = green_column_grid();
        let found = search(&grid, |c| c.green()).unwrap();
        assert_eq!(found.value, 765.0);
        assert_eq!(found.seam.columns(&grid), Some(vec![1, 1, 1]));
        assert_eq!(greenest_seam(&grid).unwrap(), found.seam);
    }

    #[test]
    fn flat_black_grid_takes_leftmost_column() {
        let mut grid = gray_grid(3, 3, &[0; 9]);
        calculate_energy(&mut grid);
        let seam = lowest_energy_seam(&grid).unwrap();
        assert_eq!(seam.columns(&grid), Some(vec![0, 0, 0]));
    }

    #[test]
    fn flat_gray_grid_dips_through_zero_energy_centre() {
        // Border cells carry their brightness, so the one interior
        // cell is the only free step; ties then pull the path left.
        let mut grid = gray_grid(3, 3, &[128; 9]);
        calculate_energy(&mut grid);
        let found = search(&grid, |c| Valuation::LowestEnergy.value(c)).unwrap();
        assert_eq!(found.seam.columns(&grid), Some(vec![0, 1, 0]));
        assert_eq!(found.value, -256.0);
    }

    #[test]
    fn ties_prefer_upper_left() {
        // Row 0 is flat; the cell at column 2 of row 1 must pick
        // column 1 above it rather than 2.
        let grid = gray_grid(3, 2, &[5, 5, 5, 0, 0, 9]);
        let found = search(&grid, |c| c.brightness()).unwrap();
        assert_eq!(found.seam.columns(&grid), Some(vec![1, 2]));
        assert_eq!(found.value, 14.0);
    }

    #[test]
    fn last_row_ties_go_to_first_maximum() {
        let grid = gray_grid(4, 1, &[1, 7, 3, 7]);
        let found = search(&grid, |c| c.brightness()).unwrap();
        assert_eq!(found.seam.columns(&grid), Some(vec![1]));
    }

    #[test]
    fn single_column_is_the_whole_grid() {
        let grid = gray_grid(1, 3, &[4, 5, 6]);
        let found = search(&grid, |c| c.brightness()).unwrap();
        assert_eq!(found.seam.columns(&grid), Some(vec![0, 0, 0]));
        assert_eq!(found.value, 15.0);
    }

    #[test]
    fn seams_are_connected_and_deterministic() {
        let mut grid = noisy_grid(17, 11);
        calculate_energy(&mut grid);
        let first = lowest_energy_seam(&grid).unwrap();
        assert_eq!(first.len(), 11);
        assert!(first.is_connected(&grid));
        assert_eq!(lowest_energy_seam(&grid).unwrap(), first);

        let greenest = greenest_seam(&grid).unwrap();
        assert!(greenest.is_connected(&grid));
        assert_eq!(greenest_seam(&grid).unwrap(), greenest);
    }

    #[test]
    fn empty_grids_have_no_seam() {
        let grid = PixelGrid::new(0, 3, Vec::<Rgb<u8>>::new()).unwrap();
        assert_eq!(
            greenest_seam(&grid).unwrap_err(),
            SeamError::EmptyGrid {
                width: 0,
                height: 3
            }
        );
        let grid = PixelGrid::new(3, 0, Vec::<Rgb<u8>>::new()).unwrap();
        assert!(greenest_seam(&grid).is_err());
    }
}
