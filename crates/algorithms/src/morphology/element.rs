//! Structuring element definitions for morphological operations
//!
//! A structuring element is a flat binary mask with an anchor (center)
//! cell. Every "on" cell contributes the offset `(row - center_row,
//! col - center_col)` to the neighborhood of an output pixel.

use chordmorph_core::{Error, RasterElement, Result};

/// Flat (binary) structuring element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    /// Row-major "on" flags
    mask: Vec<bool>,
    center_row: usize,
    center_col: usize,
}

impl Default for StructuringElement {
    /// 3x3 square
    fn default() -> Self {
        Self::filled(3, 3)
    }
}

impl StructuringElement {
    /// All-on element with the default center. Dimensions must be non-zero.
    fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            mask: vec![true; width * height],
            center_row: height / 2,
            center_col: width / 2,
        }
    }

    fn from_predicate<F>(width: usize, height: usize, on: F) -> Self
    where
        F: Fn(isize, isize) -> bool,
    {
        let mut se = Self::filled(width, height);
        let (cr, cc) = (se.center_row as isize, se.center_col as isize);
        for row in 0..height {
            for col in 0..width {
                se.mask[row * width + col] = on(row as isize - cr, col as isize - cc);
            }
        }
        se
    }

    fn check_radius(radius: usize) -> Result<()> {
        if radius == 0 {
            return Err(Error::invalid_argument(
                "radius",
                0,
                "structuring element radius must be at least 1",
            ));
        }
        Ok(())
    }

    fn check_dimensions(width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(())
    }

    /// Build an element from a row-major numeric mask; a cell is "on" iff its value is `> 0`.
    ///
    /// The center defaults to `(height / 2, width / 2)`. A mask without any
    /// "on" cell is accepted here and rejected when the element is decomposed.
    pub fn from_mask<M: RasterElement>(mask: &[M], width: usize, height: usize) -> Result<Self> {
        Self::check_dimensions(width, height)?;
        if mask.len() != width * height {
            return Err(Error::SizeMismatch {
                expected: width * height,
                actual: mask.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mask: mask.iter().map(|&v| v > M::zero()).collect(),
            center_row: height / 2,
            center_col: width / 2,
        })
    }

    /// Build an element from boolean rows, which must all have the same length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        Self::check_dimensions(width, height)?;
        if let Some(bad) = rows.iter().find(|r| r.len() != width) {
            return Err(Error::invalid_argument(
                "mask",
                format!("row length {}", bad.len()),
                format!("all rows must have length {}", width),
            ));
        }
        Ok(Self {
            width,
            height,
            mask: rows.iter().flatten().copied().collect(),
            center_row: height / 2,
            center_col: width / 2,
        })
    }

    /// Move the anchor to `(row, col)`, which must lie inside the mask.
    pub fn with_center(mut self, row: usize, col: usize) -> Result<Self> {
        if row >= self.height || col >= self.width {
            return Err(Error::invalid_argument(
                "center",
                format!("({}, {})", row, col),
                format!("center must lie inside the {}x{} mask", self.width, self.height),
            ));
        }
        self.center_row = row;
        self.center_col = col;
        Ok(self)
    }

    /// Square element of side `2 * radius + 1`
    pub fn square(radius: usize) -> Result<Self> {
        Self::check_radius(radius)?;
        Ok(Self::filled(2 * radius + 1, 2 * radius + 1))
    }

    /// All-on rectangle; even sizes put the center right of / below the middle.
    pub fn rectangle(width: usize, height: usize) -> Result<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self::filled(width, height))
    }

    /// Plus-shaped element with arms of length `radius`
    pub fn cross(radius: usize) -> Result<Self> {
        Self::check_radius(radius)?;
        let side = 2 * radius + 1;
        Ok(Self::from_predicate(side, side, |dr, dc| dr == 0 || dc == 0))
    }

    /// Disk: cells whose Euclidean distance to the center is at most `radius`
    pub fn disk(radius: usize) -> Result<Self> {
        Self::check_radius(radius)?;
        let side = 2 * radius + 1;
        let r2 = (radius * radius) as isize;
        Ok(Self::from_predicate(side, side, |dr, dc| dr * dr + dc * dc <= r2))
    }

    /// Single row of `length` cells
    pub fn horizontal_line(length: usize) -> Result<Self> {
        Self::rectangle(length, 1)
    }

    /// Single column of `length` cells
    pub fn vertical_line(length: usize) -> Result<Self> {
        Self::rectangle(1, length)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Anchor as `(row, col)`
    pub fn center(&self) -> (usize, usize) {
        (self.center_row, self.center_col)
    }

    /// Whether the cell at `(row, col)` is "on"; out-of-mask cells are off.
    pub fn is_on(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.mask[row * self.width + col]
    }

    /// Row-major mask rows
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.mask.chunks_exact(self.width)
    }

    /// Number of "on" cells
    pub fn on_count(&self) -> usize {
        self.mask.iter().filter(|&&on| on).count()
    }

    /// Whether the anchor cell itself is "on"
    pub fn contains_center(&self) -> bool {
        self.is_on(self.center_row, self.center_col)
    }

    /// Compute (dr, dc) offsets relative to center for all active cells
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let (cr, cc) = (self.center_row as isize, self.center_col as isize);
        let mut offsets = Vec::with_capacity(self.on_count());
        for (r, row) in self.rows().enumerate() {
            for (c, &active) in row.iter().enumerate() {
                if active {
                    offsets.push((r as isize - cr, c as isize - cc));
                }
            }
        }
        offsets
    }

    /// Point reflection through the center: every offset `(dr, dc)` becomes `(-dr, -dc)`.
    pub fn reflect(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            mask: self.mask.iter().rev().copied().collect(),
            center_row: self.height - 1 - self.center_row,
            center_col: self.width - 1 - self.center_col,
        }
    }
}
