//! Chord decomposition of a structuring element
//!
//! A chord is a maximal horizontal run of "on" cells in one mask row.
//! Erosion and dilation only ever need the windowed extremum over each
//! chord, so an element of any area reduces to a handful of lookups per
//! output pixel.

use chordmorph_core::{Error, Result};

use super::element::StructuringElement;

/// Horizontal run of "on" cells, with offsets relative to the element center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub row_offset: isize,
    /// Offset of the leftmost cell of the run
    pub col_offset: isize,
    /// Always at least 1
    pub length: usize,
}

impl Chord {
    /// Offset of the rightmost cell of the run
    pub fn last_col_offset(&self) -> isize {
        self.col_offset + self.length as isize - 1
    }
}

/// Split a structuring element into chords, in row-major order.
///
/// Rows without any "on" cell contribute nothing. An element with no "on"
/// cell at all has no defined identity or length ladder and is rejected.
pub fn decompose_chords(element: &StructuringElement) -> Result<Vec<Chord>> {
    let (center_row, center_col) = element.center();
    let mut chords = Vec::new();

    for (row, cells) in element.rows().enumerate() {
        let row_offset = row as isize - center_row as isize;
        let mut run_start: Option<usize> = None;

        // One extra "off" step past the end closes a trailing run
        for col in 0..=cells.len() {
            let on = cells.get(col).copied().unwrap_or(false);
            match (on, run_start) {
                (true, None) => run_start = Some(col),
                (false, Some(start)) => {
                    chords.push(Chord {
                        row_offset,
                        col_offset: start as isize - center_col as isize,
                        length: col - start,
                    });
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    if chords.is_empty() {
        return Err(Error::invalid_argument(
            "structuring_element",
            format!("{}x{} mask", element.width(), element.height()),
            "structuring element has no \"on\" cells",
        ));
    }

    Ok(chords)
}
