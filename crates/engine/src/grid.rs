//! Toroidal vegetation grid.
//!
//! # Layout
//!
//! Interior cells live at 1-based `(row, col)` with `row in 1..=width` and
//! `col in 1..=height`. A one-cell padding ring surrounds them:
//!
//! ```text
//!        col 0   1 .. height   height+1
//! row 0        [  copy of row `width`  ]
//! row 1   [h]  [  interior           ] [1]
//!  ..     [h]  [                     ] [1]
//! row w   [h]  [                     ] [1]
//! row w+1      [  copy of row 1        ]
//! ```
//!
//! Before each generation the padding is refreshed from the opposite edges,
//! so every interior cell reads exactly eight neighbors with wrap-around.

use crate::seed::CellSampler;
use verdant_types::{CellIndex, RunConfig, RunIndex};

/// Largest vegetation level a cell can hold.
pub const MAX_CELL_VALUE: u8 = 10;

/// Neighbor sum at or above which a cell loses vegetation (crowding).
const CROWDED: u16 = 25;

/// Neighbor sum at or below which a cell loses vegetation (isolation).
const SPARSE: u16 = 3;

/// Neighbor sum at or below which (and above [`SPARSE`]) a cell grows.
const FERTILE: u16 = 15;

/// Next level of a cell holding `value` with weighted neighbor sum `neighbors`.
pub fn grow(value: u8, neighbors: u16) -> u8 {
    if neighbors >= CROWDED || neighbors <= SPARSE {
        value.saturating_sub(1)
    } else if neighbors <= FERTILE {
        (value + 1).min(MAX_CELL_VALUE)
    } else {
        value
    }
}

/// Vegetation levels of one run, padded for toroidal access.
///
/// Owns a second buffer so each generation is computed from an unchanged
/// snapshot of the previous one and committed all at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    next: Vec<u8>,
}

impl Grid {
    /// Create an all-zero grid.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize + 2) * (height as usize + 2);
        Self {
            width,
            height,
            cells: vec![0; len],
            next: vec![0; len],
        }
    }

    /// Create a grid from interior values listed row by row.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold `width * height` entries or any entry
    /// exceeds [`MAX_CELL_VALUE`].
    pub fn from_values(width: u32, height: u32, values: &[u8]) -> Self {
        assert_eq!(
            values.len(),
            width as usize * height as usize,
            "expected one value per interior cell"
        );
        let mut grid = Self::new(width, height);
        for row in 1..=width {
            for col in 1..=height {
                let offset = (row - 1) as usize * height as usize + (col - 1) as usize;
                grid.set(row, col, values[offset]);
            }
        }
        grid
    }

    /// Create the initial grid of `run`: a cell starts vegetated (level 1)
    /// when the configuration's probability is positive and the cell's draw
    /// does not exceed it.
    pub fn seeded(config: &RunConfig, run: RunIndex, sampler: &impl CellSampler) -> Self {
        let mut grid = Self::new(config.width, config.height);
        if config.probability <= 0.0 {
            return grid;
        }
        for row in 1..=config.width {
            for col in 1..=config.height {
                let cell = CellIndex::of(config.height, row, col);
                if sampler.draw(run, cell) <= config.probability {
                    grid.set(row, col, 1);
                }
            }
        }
        grid
    }

    /// Grid extent along x.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid extent along y.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        row as usize * (self.height as usize + 2) + col as usize
    }

    /// Level of the interior cell at 1-based `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> u8 {
        debug_assert!((1..=self.width).contains(&row) && (1..=self.height).contains(&col));
        self.cells[self.offset(row, col)]
    }

    /// Set the interior cell at 1-based `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `value` exceeds [`MAX_CELL_VALUE`].
    pub fn set(&mut self, row: u32, col: u32, value: u8) {
        assert!(value <= MAX_CELL_VALUE, "cell value {value} out of range");
        debug_assert!((1..=self.width).contains(&row) && (1..=self.height).contains(&col));
        let offset = self.offset(row, col);
        self.cells[offset] = value;
    }

    /// Iterate interior values row by row.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=self.width).flat_map(move |row| (1..=self.height).map(move |col| self.get(row, col)))
    }

    /// Total vegetation over the interior.
    pub fn vegetation(&self) -> u64 {
        self.values().map(u64::from).sum()
    }

    /// Refresh the padding ring from the opposite edges.
    ///
    /// Columns first, then whole rows including their padding, so the four
    /// corners pick up the diagonally opposite interior cell.
    pub fn wrap_borders(&mut self) {
        let (w, h) = (self.width, self.height);
        for row in 1..=w {
            let last = self.cells[self.offset(row, h)];
            let first = self.cells[self.offset(row, 1)];
            let left = self.offset(row, 0);
            let right = self.offset(row, h + 1);
            self.cells[left] = last;
            self.cells[right] = first;
        }

        let stride = h as usize + 2;
        let top = self.offset(0, 0);
        let bottom = self.offset(w + 1, 0);
        let first_row = self.offset(1, 0);
        let last_row = self.offset(w, 0);
        self.cells.copy_within(last_row..last_row + stride, top);
        self.cells.copy_within(first_row..first_row + stride, bottom);
    }

    /// Weighted sum of the eight neighbors of `(row, col)`.
    ///
    /// Reads the padding ring, so [`Grid::wrap_borders`] must have run since
    /// the last change.
    pub fn neighbor_sum(&self, row: u32, col: u32) -> u16 {
        let mut sum = 0u16;
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if r != row || c != col {
                    sum += u16::from(self.cells[self.offset(r, c)]);
                }
            }
        }
        sum
    }

    /// Advance one generation.
    pub fn advance(&mut self) {
        self.wrap_borders();
        for row in 1..=self.width {
            for col in 1..=self.height {
                let offset = self.offset(row, col);
                self.next[offset] = grow(self.cells[offset], self.neighbor_sum(row, col));
            }
        }
        std::mem::swap(&mut self.cells, &mut self.next);
    }
}
