//! Derived geometry shared by one erode/dilate call
//!
//! The context is computed once from the chord list and is read-only
//! afterwards: offset bounds, the chord-length ladder used by the doubling
//! recurrence, the length → ladder position map and the table padding.

use std::collections::BTreeMap;

use chordmorph_core::{Error, RasterElement, Result};

use super::chord::Chord;
use super::MorphOp;

/// What to do with chords that reach past the padded lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChordPolicy {
    /// Fail with an invalid-argument error before any row is processed
    Reject,
    /// Skip lookups whose start column falls left of the padded row.
    ///
    /// Lossy for off-center geometry: in-frame pixels covered only by a
    /// skipped chord do not contribute.
    Skip,
    /// Widen the padding until every chord fits; exact for any geometry
    #[default]
    Pad,
}

/// Offset range spanned by a chord list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryBounds {
    pub min_row_offset: isize,
    pub max_row_offset: isize,
    /// Leftmost column offset of any chord
    pub min_col: isize,
    /// Rightmost column offset of any chord
    pub max_col: isize,
}

impl GeometryBounds {
    /// Bounds of a non-empty chord list
    pub fn of(chords: &[Chord]) -> Option<Self> {
        let first = chords.first()?;
        let init = Self {
            min_row_offset: first.row_offset,
            max_row_offset: first.row_offset,
            min_col: first.col_offset,
            max_col: first.last_col_offset(),
        };
        Some(chords.iter().fold(init, |b, c| Self {
            min_row_offset: b.min_row_offset.min(c.row_offset),
            max_row_offset: b.max_row_offset.max(c.row_offset),
            min_col: b.min_col.min(c.col_offset),
            max_col: b.max_col.max(c.last_col_offset()),
        }))
    }

    /// Half the horizontal span, rounded down
    pub fn pad_radius(&self) -> usize {
        ((self.max_col - self.min_col) / 2) as usize
    }

    /// Number of source rows one output row depends on
    pub fn window_height(&self) -> usize {
        (self.max_row_offset - self.min_row_offset + 1) as usize
    }

    /// Whether every chord lies within `[-pad, pad]` columns of the center
    pub fn fits(&self, pad: usize) -> bool {
        self.min_col >= -(pad as isize) && self.max_col <= pad as isize
    }
}

/// Ascending window lengths `1 = L0 < L1 < ... < Lk` with `Li <= 2 * L(i-1)`.
///
/// Built from `{1} ∪ {chord lengths}`; wherever two neighbours are more than
/// a factor of two apart, `ceil((Li + 1) / 2)` is inserted before `Li` and
/// the check resumes at the inserted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordLadder {
    lengths: Vec<usize>,
}

impl ChordLadder {
    /// Build the ladder for a set of chord lengths (zeros are ignored)
    pub fn build<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut ladder: Vec<usize> = std::iter::once(1)
            .chain(lengths.into_iter().filter(|&l| l > 0))
            .collect();
        ladder.sort_unstable();
        ladder.dedup();

        let mut i = 1;
        while i < ladder.len() {
            if ladder[i] > 2 * ladder[i - 1] {
                let bridge = (ladder[i] + 2) / 2;
                ladder.insert(i, bridge);
            } else {
                i += 1;
            }
        }

        Self { lengths: ladder }
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest window in the ladder
    pub fn max_length(&self) -> usize {
        self.lengths.last().copied().unwrap_or(0)
    }

    /// Position of a length in the ladder
    pub fn position(&self, length: usize) -> Option<usize> {
        self.lengths.binary_search(&length).ok()
    }
}

/// Immutable per-call geometry derived from the chords
#[derive(Debug, Clone)]
pub struct MorphologyContext {
    chords: Vec<Chord>,
    bounds: GeometryBounds,
    ladder: ChordLadder,
    /// Actual chord length → ladder position
    length_index: BTreeMap<usize, usize>,
    pad_radius: usize,
    policy: ChordPolicy,
}

impl MorphologyContext {
    pub fn new(chords: Vec<Chord>, policy: ChordPolicy) -> Result<Self> {
        let bounds = GeometryBounds::of(&chords).ok_or_else(|| {
            Error::invalid_argument("chords", "[]", "at least one chord is required")
        })?;

        let ladder = ChordLadder::build(chords.iter().map(|c| c.length));
        let mut length_index = BTreeMap::new();
        for chord in &chords {
            if let Some(pos) = ladder.position(chord.length) {
                length_index.insert(chord.length, pos);
            }
        }

        let mut pad_radius = bounds.pad_radius();
        if !bounds.fits(pad_radius) {
            match policy {
                ChordPolicy::Reject => {
                    return Err(Error::invalid_argument(
                        "structuring_element",
                        format!("columns {}..={}", bounds.min_col, bounds.max_col),
                        format!(
                            "chords reach outside the +/-{} column padding; \
                             use the pad or skip chord policy for off-center elements",
                            pad_radius
                        ),
                    ));
                }
                ChordPolicy::Skip => {}
                ChordPolicy::Pad => {
                    pad_radius = pad_radius
                        .max((-bounds.min_col).max(0) as usize)
                        .max(bounds.max_col.max(0) as usize);
                }
            }
        }

        Ok(Self {
            chords,
            bounds,
            ladder,
            length_index,
            pad_radius,
            policy,
        })
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn bounds(&self) -> &GeometryBounds {
        &self.bounds
    }

    pub fn ladder(&self) -> &ChordLadder {
        &self.ladder
    }

    pub fn policy(&self) -> ChordPolicy {
        self.policy
    }

    /// Ladder position of an actual chord length
    pub fn ladder_index(&self, length: usize) -> Option<usize> {
        self.length_index.get(&length).copied()
    }

    /// Columns of identity padding on each side of a table row
    pub fn pad_radius(&self) -> usize {
        self.pad_radius
    }

    pub fn window_height(&self) -> usize {
        self.bounds.window_height()
    }

    /// Table row width for an image of `width` columns
    pub fn padded_width(&self, width: usize) -> usize {
        width + 2 * self.pad_radius
    }

    /// Output buffer seeded with the operator's identity
    pub fn seed_output<T: RasterElement>(&self, op: MorphOp, width: usize, height: usize) -> Vec<T> {
        vec![op.identity(); width * height]
    }
}
