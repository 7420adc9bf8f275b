// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An editing session with undo
//!
//! The editor owns one grid and a history of what was done to it.
//! Each history entry is a plain record holding exactly what is
//! needed to reverse it, and `invert` is the only thing that knows how
//! to do that.

use crate::energy::calculate_energy;
use crate::errors::SeamError;
use crate::pixelgrid::PixelGrid;
use crate::seam::Seam;
use crate::seamfinder::{find_maximizing_seam, Valuation};
use crate::seamops::{add, highlight, remove, unhighlight};
use image::Rgb;
use log::{info, warn};

/// One undoable step.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A seam was covered with `color`.  `original` holds the covered
    /// cells; `previous` is whatever was highlighted before.
    Highlight {
        original: Seam,
        color: Rgb<u8>,
        previous: Option<Seam>,
    },
    /// A seam was taken out of the grid.
    Remove { seam: Seam },
}

/// Reverse `operation` on `grid`.  On error the grid is unchanged.
pub fn invert(grid: &mut PixelGrid, operation: &Operation) -> Result<(), SeamError> {
    match operation {
        Operation::Highlight { original, .. } => unhighlight(grid, original),
        Operation::Remove { seam } => add(grid, seam),
    }
}

#[derive(Debug)]
pub struct Editor {
    grid: PixelGrid,
    history: Vec<Operation>,
    highlighted: Option<Seam>,
}

impl Editor {
    pub fn new(grid: PixelGrid) -> Self {
        Editor {
            grid,
            history: Vec::new(),
            highlighted: None,
        }
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn into_grid(self) -> PixelGrid {
        self.grid
    }

    /// The cells currently covered by a highlight, if any.
    pub fn highlighted(&self) -> Option<&Seam> {
        self.highlighted.as_ref()
    }

    pub fn history(&self) -> &[Operation] {
        &self.history
    }

    /// How many operations `undo` can still reverse.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Carving stops at one column.
    pub fn can_modify(&self) -> bool {
        self.grid.width() > 1
    }

    fn ensure_modifiable(&self) -> Result<(), SeamError> {
        if self.can_modify() {
            Ok(())
        } else {
            warn!("refusing to edit an image {} wide", self.grid.width());
            Err(SeamError::TooNarrow {
                width: self.grid.width(),
            })
        }
    }

    /// Find the best seam by `valuation` and cover it with that
    /// valuation's overlay color.
    pub fn highlight(&mut self, valuation: Valuation) -> Result<(), SeamError> {
        self.ensure_modifiable()?;
        if valuation == Valuation::LowestEnergy {
            calculate_energy(&mut self.grid);
        }
        let seam = find_maximizing_seam(&self.grid, |cell| valuation.value(cell))?;
        let color = valuation.overlay_color();
        let original = highlight(&mut self.grid, &seam, color)?;
        let previous = self.highlighted.replace(original.clone());
        self.history.push(Operation::Highlight {
            original,
            color,
            previous,
        });
        info!("highlighted {} seam", valuation.describe());
        Ok(())
    }

    pub fn highlight_greenest(&mut self) -> Result<(), SeamError> {
        self.highlight(Valuation::Greenest)
    }

    pub fn highlight_lowest_energy(&mut self) -> Result<(), SeamError> {
        self.highlight(Valuation::LowestEnergy)
    }

    /// Remove the highlighted seam.  The highlight itself leaves the
    /// history: undoing the removal brings back the uncovered cells.
    /// Returns false if nothing was highlighted.
    pub fn remove_highlighted(&mut self) -> Result<bool, SeamError> {
        self.ensure_modifiable()?;
        let original = match self.highlighted.take() {
            Some(original) => original,
            None => return Ok(false),
        };
        if let Err(e) = unhighlight(&mut self.grid, &original) {
            self.highlighted = Some(original);
            return Err(e);
        }
        // Cannot fail: the cells were put back an instant ago.
        remove(&mut self.grid, &original)?;
        if let Some(Operation::Highlight { .. }) = self.history.last() {
            self.history.pop();
        }
        self.history.push(Operation::Remove { seam: original });
        info!("removed highlighted seam, width now {}", self.grid.width());
        Ok(true)
    }

    /// Reverse the most recent operation.  Returns false if there was
    /// nothing to undo.  A failed undo stays on the history.
    pub fn undo(&mut self) -> Result<bool, SeamError> {
        let operation = match self.history.pop() {
            Some(operation) => operation,
            None => return Ok(false),
        };
        if let Err(e) = invert(&mut self.grid, &operation) {
            self.history.push(operation);
            return Err(e);
        }
        if let Operation::Highlight { previous, .. } = operation {
            self.highlighted = previous;
        }
        info!("{} undo operations left", self.history.len());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixelgrid::gray_grid;

    const LEVELS: [u8; 9] = [10, 200, 30, 50, 60, 250, 90, 100, 110];

    fn editor() -> Editor {
        Editor::new(gray_grid(3, 3, &LEVELS))
    }

    #[test]
    fn highlight_then_undo() {
        let mut ed = editor();
        let colors = ed.grid().to_color_sequence();

        ed.highlight_greenest().unwrap();
        assert_eq!(ed.undo_depth(), 1);
        assert!(ed.highlighted().is_some());
        assert_eq!(ed.grid().width(), 3);
        let greens = ed
            .grid()
            .to_color_sequence()
            .into_iter()
            .filter(|c| *c == Rgb([0, 255, 0]))
            .count();
        assert_eq!(greens, 3);

        assert!(ed.undo().unwrap());
        assert_eq!(ed.undo_depth(), 0);
        assert!(ed.highlighted().is_none());
        assert_eq!(ed.grid().width(), 3);
        assert_eq!(ed.grid().to_color_sequence(), colors);
        assert!(!ed.undo().unwrap());
    }

    #[test]
    fn remove_then_undo_restores_uncovered_colors() {
        let mut ed = editor();
        let colors = ed.grid().to_color_sequence();

        ed.highlight_lowest_energy().unwrap();
        assert!(ed.remove_highlighted().unwrap());
        assert_eq!(ed.grid().width(), 2);
        assert_eq!(ed.undo_depth(), 1);
        assert!(ed.highlighted().is_none());
        assert!(ed
            .grid()
            .to_color_sequence()
            .iter()
            .all(|c| *c != Rgb([255, 0, 0])));

        assert!(ed.undo().unwrap());
        assert_eq!(ed.grid().width(), 3);
        assert_eq!(ed.grid().to_color_sequence(), colors);
    }

    #[test]
    fn nothing_to_remove() {
        let mut ed = editor();
        assert!(!ed.remove_highlighted().unwrap());
        assert_eq!(ed.undo_depth(), 0);
    }

    #[test]
    fn narrow_images_are_refused() {
        let mut ed = Editor::new(gray_grid(1, 3, &[1, 2, 3]));
        assert!(!ed.can_modify());
        assert_eq!(
            ed.highlight_greenest(),
            Err(SeamError::TooNarrow { width: 1 })
        );
        assert_eq!(ed.undo_depth(), 0);
    }

    #[test]
    fn carve_down_to_one_column_and_back() {
        let mut ed = editor();
        let colors = ed.grid().to_color_sequence();
        for _ in 0..2 {
            ed.highlight_lowest_energy().unwrap();
            ed.remove_highlighted().unwrap();
        }
        assert_eq!(ed.grid().width(), 1);
        assert!(ed.highlight_greenest().is_err());
        while ed.undo().unwrap() {}
        assert_eq!(ed.grid().to_color_sequence(), colors);
        assert!(ed.grid().is_consistent());
    }

    #[test]
    fn stacked_highlights_unwind() {
        let mut ed = editor();
        let colors = ed.grid().to_color_sequence();
        ed.highlight_greenest().unwrap();
        let first = ed.highlighted().cloned();
        ed.highlight_lowest_energy().unwrap();
        assert_eq!(ed.undo_depth(), 2);

        ed.undo().unwrap();
        assert_eq!(ed.highlighted().cloned(), first);
        ed.undo().unwrap();
        assert_eq!(ed.grid().to_color_sequence(), colors);
    }

    #[test]
    fn history_records_each_step() {
        let mut ed = editor();
        let colors = ed.grid().to_color_sequence();
        ed.highlight_greenest().unwrap();
        let original = ed.highlighted().cloned().unwrap();
        assert_eq!(
            ed.history(),
            &[Operation::Highlight {
                original: original.clone(),
                color: Rgb([0, 255, 0]),
                previous: None,
            }][..]
        );

        ed.remove_highlighted().unwrap();
        let last = Operation::Remove { seam: original };
        assert_eq!(ed.history(), &[last.clone()][..]);

        // The record alone is enough to undo, even outside the editor.
        let mut grid = ed.into_grid();
        assert_eq!(grid.width(), 2);
        invert(&mut grid, &last).unwrap();
        assert_eq!(grid.to_color_sequence(), colors);
    }

    #[test]
    fn invert_is_a_free_function() {
        let mut grid = gray_grid(3, 3, &LEVELS);
        let colors = grid.to_color_sequence();
        let seam = crate::seamfinder::greenest_seam(&grid).unwrap();
        remove(&mut grid, &seam).unwrap();
        invert(&mut grid, &Operation::Remove { seam }).unwrap();
        assert_eq!(grid.to_color_sequence(), colors);
    }
}
