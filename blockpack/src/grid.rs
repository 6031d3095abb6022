//! Occupancy tracking for a single canvas attempt.

/// A block-space occupancy grid for one canvas attempt.
///
/// Cells hold the index of the rectangle occupying them, or `None` when free.
/// The buffer is a single contiguous allocation indexed by (row, column);
/// every attempt builds a fresh grid, so occupancy never leaks between
/// attempts.
#[derive(Debug)]
pub(crate) struct BlockGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<usize>>,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    /// Scans row-major (top row first, left to right) for the first anchor
    /// whose `width x height` footprint lies in bounds and is entirely free.
    pub fn first_fit(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width || height > self.height {
            return None;
        }

        for y in 0..=(self.height - height) {
            for x in 0..=(self.width - width) {
                if self.footprint_free(x, y, width, height) {
                    return Some((x, y));
                }
            }
        }

        None
    }

    /// Claims a footprint for the rectangle at `index`. The caller must have
    /// obtained `anchor` from `first_fit` with the same footprint size.
    pub fn mark(&mut self, anchor: (u32, u32), width: u32, height: u32, index: usize) {
        debug_assert!(anchor.0 + width <= self.width);
        debug_assert!(anchor.1 + height <= self.height);

        for y in anchor.1..(anchor.1 + height) {
            for x in anchor.0..(anchor.0 + width) {
                let cell = self.cell_index(x, y);
                debug_assert!(self.cells[cell].is_none());
                self.cells[cell] = Some(index);
            }
        }
    }

    fn footprint_free(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        for yy in y..(y + height) {
            for xx in x..(x + width) {
                if self.cells[self.cell_index(xx, yy)].is_some() {
                    return false;
                }
            }
        }

        true
    }

    fn cell_index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + (x as usize)
    }
}
