//! Row lookup table: sliding window of per-row windowed extrema
//!
//! For every source row the current output row depends on, the table holds
//! one slot. A slot stores, per padded column `x` and per ladder position
//! `i`, the min (erosion) or max (dilation) of the `ladder[i]` samples
//! starting at `x`. Level 0 is the padded row itself; each further level is
//! folded from two overlapping windows of the level below:
//!
//! ```text
//! level[i][x] = combine(level[i-1][x], level[i-1][x + ladder[i] - ladder[i-1]])
//! ```
//!
//! Slots live in one arena used as a circular buffer. Moving to the next
//! output row evicts the topmost slot, reuses its storage for the newly
//! entering source row and recomputes only that slot.
//!
//! Source rows outside the image, and the padding columns, hold the
//! operator's identity, which behaves as if the image were surrounded by
//! `+inf` (erosion) or `-inf` (dilation). Windows running past the right end
//! of a padded row are clipped to it, so they see identity there as well.

use chordmorph_core::{Error, RasterElement, Result};

use super::context::MorphologyContext;
use super::MorphOp;

/// Circular buffer of `window_height` slots of `ladder.len() x padded_width` values
#[derive(Debug, Clone)]
pub struct RowLookupTable<'a, T: RasterElement> {
    op: MorphOp,
    samples: &'a [T],
    width: usize,
    height: usize,
    ladder: &'a [usize],
    pad: usize,
    padded_width: usize,
    min_row_offset: isize,
    window_height: usize,
    cells: Vec<T>,
    /// Physical slot holding logical row 0
    head: usize,
    /// Output row the window is positioned for
    row: usize,
}

impl<'a, T: RasterElement> RowLookupTable<'a, T> {
    /// Allocate the table and build the full window for output row `row`
    pub fn new(
        ctx: &'a MorphologyContext,
        op: MorphOp,
        samples: &'a [T],
        width: usize,
        height: usize,
        row: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if samples.len() != width * height {
            return Err(Error::SizeMismatch {
                expected: width * height,
                actual: samples.len(),
            });
        }

        let ladder = ctx.ladder().lengths();
        let padded_width = ctx.padded_width(width);
        let window_height = ctx.window_height();

        let mut table = Self {
            op,
            samples,
            width,
            height,
            ladder,
            pad: ctx.pad_radius(),
            padded_width,
            min_row_offset: ctx.bounds().min_row_offset,
            window_height,
            cells: vec![op.identity(); window_height * ladder.len() * padded_width],
            head: 0,
            row,
        };
        table.build_at(row);
        Ok(table)
    }

    /// Rebuild every slot from scratch for output row `row`
    pub fn build_at(&mut self, row: usize) {
        self.row = row;
        self.head = 0;
        for logical in 0..self.window_height {
            let source = self.source_row(logical);
            self.fill_slot(logical, source);
        }
    }

    /// Move the window down by one output row.
    ///
    /// Rotates the buffer in O(1) and recomputes the single slot for the
    /// entering source row `row + max_row_offset`.
    pub fn advance(&mut self) {
        let evicted = self.head;
        self.head = (self.head + 1) % self.window_height;
        self.row += 1;
        let entering = self.source_row(self.window_height - 1);
        self.fill_slot(evicted, entering);
    }

    /// Output row the window is currently positioned for
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn window_height(&self) -> usize {
        self.window_height
    }

    pub fn padded_width(&self) -> usize {
        self.padded_width
    }

    pub fn ladder_len(&self) -> usize {
        self.ladder.len()
    }

    /// Source row held by logical slot `logical`; may lie outside the image
    pub fn source_row(&self, logical: usize) -> isize {
        self.row as isize + self.min_row_offset + logical as isize
    }

    /// Windowed extrema of length `ladder[ladder_index]` for logical slot
    /// `logical`, one value per padded column.
    pub fn level(&self, logical: usize, ladder_index: usize) -> &[T] {
        let start = (self.physical(logical) * self.ladder.len() + ladder_index) * self.padded_width;
        &self.cells[start..start + self.padded_width]
    }

    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.window_height
    }

    /// Recompute every level of one physical slot for `source_row`
    fn fill_slot(&mut self, physical: usize, source_row: isize) {
        let op = self.op;
        let lw = self.padded_width;
        let slot_len = self.ladder.len() * lw;
        let slot = &mut self.cells[physical * slot_len..(physical + 1) * slot_len];
        slot.fill(op.identity());

        if source_row < 0 || source_row >= self.height as isize {
            return;
        }

        let r = source_row as usize;
        slot[self.pad..self.pad + self.width]
            .copy_from_slice(&self.samples[r * self.width..(r + 1) * self.width]);

        for i in 1..self.ladder.len() {
            let d = self.ladder[i] - self.ladder[i - 1];
            let (lower, upper) = slot.split_at_mut(i * lw);
            let prev = &lower[(i - 1) * lw..];
            let cur = &mut upper[..lw];

            let split = lw.saturating_sub(d);
            for (out, (&a, &b)) in cur[..split]
                .iter_mut()
                .zip(prev[..split].iter().zip(&prev[d..]))
            {
                *out = op.combine(a, b);
            }
            cur[split..].copy_from_slice(&prev[split..]);
        }
    }
}
