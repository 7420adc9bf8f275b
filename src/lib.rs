// #![deny(missing_docs)]

//! Seam carving on a mutable, linked pixel grid, with every edit
//! reversible.

mod ternary;

pub mod cell;
pub use cell::{Cell, CellId};

pub mod errors;
pub use errors::SeamError;

pub mod pixelgrid;
pub use pixelgrid::PixelGrid;

mod twodmap;

pub mod energy;
pub use energy::calculate_energy;

pub mod seam;
pub use seam::Seam;

pub mod seamfinder;
pub use seamfinder::{find_maximizing_seam, greenest_seam, lowest_energy_seam, Valuation};

pub mod seamops;
pub use seamops::{add, highlight, remove, unhighlight};

pub mod editor;
pub use editor::{invert, Editor, Operation};
