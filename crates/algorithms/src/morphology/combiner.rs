//! Row combiner: folds chord lookups into one output row

use chordmorph_core::{Error, RasterElement, Result};

use super::context::MorphologyContext;
use super::table::RowLookupTable;
use super::MorphOp;

/// Table coordinates of one chord, resolved once per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChordLookup {
    /// Logical table slot: `row_offset - min_row_offset`
    table_row: usize,
    ladder_index: usize,
    /// Added to an output column to get the table column: `col_offset + pad`
    shift: isize,
}

/// Combines chord-indexed table lookups into erosion/dilation results
#[derive(Debug, Clone)]
pub struct RowCombiner {
    op: MorphOp,
    lookups: Vec<ChordLookup>,
}

impl RowCombiner {
    pub fn new(ctx: &MorphologyContext, op: MorphOp) -> Result<Self> {
        let min_row = ctx.bounds().min_row_offset;
        let pad = ctx.pad_radius() as isize;

        let lookups = ctx
            .chords()
            .iter()
            .map(|chord| {
                let ladder_index = ctx.ladder_index(chord.length).ok_or_else(|| {
                    Error::Other(format!("chord length {} missing from ladder", chord.length))
                })?;
                Ok(ChordLookup {
                    table_row: (chord.row_offset - min_row) as usize,
                    ladder_index,
                    shift: chord.col_offset + pad,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { op, lookups })
    }

    /// Number of table lookups per output pixel
    pub fn lookups_per_pixel(&self) -> usize {
        self.lookups.len()
    }

    /// Fold every chord's lookup into `out`, which holds one output row.
    ///
    /// `out` must be seeded with the operator's identity (or hold a partial
    /// result to refine). Lookups whose table column falls outside the
    /// padded row are skipped, which is the same as folding the identity.
    pub fn combine_row<T: RasterElement>(&self, table: &RowLookupTable<'_, T>, out: &mut [T]) {
        let width = out.len() as isize;
        let lw = table.padded_width() as isize;

        for lookup in &self.lookups {
            let lo = (-lookup.shift).clamp(0, width);
            let hi = (lw - lookup.shift).clamp(lo, width);
            if lo == hi {
                continue;
            }

            let level = table.level(lookup.table_row, lookup.ladder_index);
            let src = &level[(lo + lookup.shift) as usize..(hi + lookup.shift) as usize];
            for (acc, &v) in out[lo as usize..hi as usize].iter_mut().zip(src) {
                *acc = self.op.combine(*acc, v);
            }
        }
    }
}
