use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field, indexed by (column, row).
/// The linked grid has no random access, so the seam search copies
/// what it needs into one of these: the cumulative value and the
/// parent column of every position.
#[derive(Debug)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    pub width: u32,
    pub height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map, every position holding `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// The best cumulative value reaching a position, and the column in
/// the row above that it came from.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ValueAndBackPointer {
    pub value: f64,
    pub parent: u32,
}

impl Default for ValueAndBackPointer {
    fn default() -> Self {
        ValueAndBackPointer {
            value: std::f64::NEG_INFINITY,
            parent: 0,
        }
    }
}
