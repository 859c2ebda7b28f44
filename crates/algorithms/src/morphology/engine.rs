//! Erode/dilate orchestration
//!
//! One call decomposes the element, derives the context, builds the lookup
//! table for the first output row and then scans down the image, rotating
//! the table by one row per output row.

use chordmorph_core::{Error, RasterElement, Result};
use tracing::{debug, trace};

use crate::maybe_rayon::*;

use super::chord::decompose_chords;
use super::combiner::RowCombiner;
use super::context::{ChordPolicy, MorphologyContext};
use super::element::StructuringElement;
use super::table::RowLookupTable;

/// Bands are never shorter than this many table windows, so the initial
/// build stays small next to the incremental updates.
const MIN_BAND_WINDOWS: usize = 4;

/// The two basic operators and their fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphOp {
    /// Minimum over the element; identity is the domain maximum
    Erode,
    /// Maximum over the element; identity is the domain minimum
    Dilate,
}

impl MorphOp {
    /// Value that never wins the fold
    pub fn identity<T: RasterElement>(self) -> T {
        match self {
            MorphOp::Erode => T::max_value(),
            MorphOp::Dilate => T::min_value(),
        }
    }

    /// `min` for erosion, `max` for dilation; keeps `acc` on ties and NaN
    #[inline]
    pub fn combine<T: RasterElement>(self, acc: T, value: T) -> T {
        match self {
            MorphOp::Erode => {
                if value < acc {
                    value
                } else {
                    acc
                }
            }
            MorphOp::Dilate => {
                if value > acc {
                    value
                } else {
                    acc
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MorphOp::Erode => "erode",
            MorphOp::Dilate => "dilate",
        }
    }
}

/// Execution strategy for the row scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// One incremental scan over all rows
    #[default]
    Sequential,
    /// Split rows into bands scanned on the global rayon pool
    Parallel,
    /// Like `Parallel`, on a dedicated pool with this many threads
    ParallelWith(usize),
}

/// Knobs shared by all morphology entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MorphologyOptions {
    pub policy: ChordPolicy,
    pub mode: ProcessingMode,
}

impl MorphologyOptions {
    pub fn with_policy(mut self, policy: ChordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Apply `op` with `element` to a row-major sample buffer.
///
/// All validation happens before the first row is touched: dimensions must
/// be non-zero, the buffer must hold `width * height` samples, the element
/// must have at least one "on" cell and its geometry must satisfy the
/// chord policy.
pub fn morphology<T: RasterElement>(
    op: MorphOp,
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Vec<T>> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if samples.len() != width * height {
        return Err(Error::SizeMismatch {
            expected: width * height,
            actual: samples.len(),
        });
    }

    let ctx = MorphologyContext::new(decompose_chords(element)?, options.policy)?;
    let combiner = RowCombiner::new(&ctx, op)?;
    debug!(
        op = op.name(),
        width,
        height,
        chords = ctx.chords().len(),
        ladder = ?ctx.ladder().lengths(),
        pad = ctx.pad_radius(),
        window = ctx.window_height(),
        policy = ?ctx.policy(),
        mode = ?options.mode,
        "morphology context"
    );

    let mut output = ctx.seed_output(op, width, height);
    let scan = Scan {
        ctx: &ctx,
        combiner: &combiner,
        op,
        samples,
        width,
        height,
    };

    match options.mode {
        ProcessingMode::Sequential => scan.band(0, &mut output)?,
        ProcessingMode::Parallel => scan.bands(current_num_threads(), &mut output)?,
        #[cfg(feature = "parallel")]
        ProcessingMode::ParallelWith(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::Other(format!("cannot build thread pool: {}", e)))?;
            pool.install(|| scan.bands(threads, &mut output))?
        }
        #[cfg(not(feature = "parallel"))]
        ProcessingMode::ParallelWith(_) => scan.band(0, &mut output)?,
    }

    Ok(output)
}

/// Shared, read-only inputs of one scan
struct Scan<'a, T: RasterElement> {
    ctx: &'a MorphologyContext,
    combiner: &'a RowCombiner,
    op: MorphOp,
    samples: &'a [T],
    width: usize,
    height: usize,
}

impl<T: RasterElement> Scan<'_, T> {
    /// Scan the output rows held in `out`, the first of which is `first_row`
    fn band(&self, first_row: usize, out: &mut [T]) -> Result<()> {
        let mut table = RowLookupTable::new(
            self.ctx,
            self.op,
            self.samples,
            self.width,
            self.height,
            first_row,
        )?;

        for (i, out_row) in out.chunks_exact_mut(self.width).enumerate() {
            if i > 0 {
                table.advance();
            }
            self.combiner.combine_row(&table, out_row);
        }
        Ok(())
    }

    /// Split the rows into bands, each with its own table
    fn bands(&self, threads: usize, out: &mut [T]) -> Result<()> {
        let band_rows = self
            .height
            .div_ceil(threads.max(1))
            .max(MIN_BAND_WINDOWS * self.ctx.window_height())
            .min(self.height);

        out.par_chunks_mut(band_rows * self.width)
            .enumerate()
            .try_for_each(|(band, chunk)| {
                let first_row = band * band_rows;
                trace!(band, first_row, rows = chunk.len() / self.width, "scanning band");
                self.band(first_row, chunk)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_combine() {
        assert_eq!(MorphOp::Erode.identity::<u8>(), 255);
        assert_eq!(MorphOp::Dilate.identity::<i16>(), i16::MIN);
        assert_eq!(MorphOp::Erode.identity::<f64>(), f64::INFINITY);
        assert_eq!(MorphOp::Erode.combine(4u8, 2), 2);
        assert_eq!(MorphOp::Dilate.combine(4u8, 2), 4);
        assert_eq!(MorphOp::Erode.combine(3.0f32, MorphOp::Erode.identity()), 3.0);
    }

    #[test]
    fn test_validation_before_work() {
        let se = StructuringElement::default();
        let opts = MorphologyOptions::default();
        assert!(matches!(
            morphology(MorphOp::Erode, &[] as &[u8], 0, 3, &se, &opts),
            Err(Error::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(matches!(
            morphology(MorphOp::Dilate, &[1u8, 2, 3], 2, 2, &se, &opts),
            Err(Error::SizeMismatch { .. })
        ));
        let empty = StructuringElement::from_mask(&[0u8; 9], 3, 3).unwrap();
        let err = morphology(MorphOp::Erode, &[1u8; 4], 2, 2, &empty, &opts).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_single_pixel_element_is_identity() {
        let se = StructuringElement::rectangle(1, 1).unwrap();
        let samples: Vec<u16> = (0..35).map(|i| (i * 977 % 65535) as u16).collect();
        let opts = MorphologyOptions::default();
        assert_eq!(morphology(MorphOp::Erode, &samples, 7, 5, &se, &opts).unwrap(), samples);
        assert_eq!(morphology(MorphOp::Dilate, &samples, 7, 5, &se, &opts).unwrap(), samples);
    }

    #[test]
    fn test_bands_match_sequential() {
        let se = StructuringElement::disk(2).unwrap();
        let (width, height) = (13, 61);
        let samples: Vec<u8> = (0..width * height).map(|i| (i * 131 % 251) as u8).collect();

        let seq = morphology(MorphOp::Erode, &samples, width, height, &se, &MorphologyOptions::default())
            .unwrap();
        for mode in [ProcessingMode::Parallel, ProcessingMode::ParallelWith(3)] {
            let opts = MorphologyOptions::default().with_mode(mode);
            let par = morphology(MorphOp::Erode, &samples, width, height, &se, &opts).unwrap();
            assert_eq!(par, seq, "mode {mode:?}");
        }
    }

    #[test]
    fn test_band_split_with_many_threads() {
        let se = StructuringElement::vertical_line(3).unwrap();
        let (width, height) = (4, 50);
        let samples: Vec<i32> = (0..(width * height) as i32).map(|i| (i * 7) % 19).collect();
        let ctx = MorphologyContext::new(decompose_chords(&se).unwrap(), ChordPolicy::Reject).unwrap();
        let combiner = RowCombiner::new(&ctx, MorphOp::Dilate).unwrap();
        let scan = Scan {
            ctx: &ctx,
            combiner: &combiner,
            op: MorphOp::Dilate,
            samples: &samples,
            width,
            height,
        };

        let mut whole = ctx.seed_output(MorphOp::Dilate, width, height);
        scan.band(0, &mut whole).unwrap();
        // 50 rows over 16 "threads" gives 12-row bands (4 windows of 3 rows)
        let mut banded = ctx.seed_output(MorphOp::Dilate, width, height);
        scan.bands(16, &mut banded).unwrap();
        assert_eq!(banded, whole);
    }
}
