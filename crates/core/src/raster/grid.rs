//! Main Raster type

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::Array2;

/// A 2D grid of samples.
///
/// `Raster<T>` stores values of type `T` in row-major order, `(row, col)`
/// indexed. It is the owned value type passed between the codec, the
/// morphology algorithms and the command line.
///
/// # Example
///
/// ```ignore
/// use chordmorph_core::Raster;
///
/// // Create a 100x100 raster filled with zeros
/// let mut raster: Raster<u16> = Raster::new(100, 100);
///
/// raster.set(10, 20, 42)?;
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a raster from row-major samples
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::SizeMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Row-major samples, borrowed when the storage is already contiguous
    pub fn samples(&self) -> Cow<'_, [T]> {
        match self.data.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.data.iter().copied().collect()),
        }
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Consume the raster and return its samples in row-major order
    pub fn into_vec(self) -> Vec<T> {
        if self.data.is_standard_layout() {
            let len = self.data.len();
            let (mut raw, offset) = self.data.into_raw_vec_and_offset();
            raw.drain(..offset.unwrap_or(0));
            raw.truncate(len);
            raw
        } else {
            self.data.iter().copied().collect()
        }
    }

    /// Combine two equally sized rasters cell by cell
    pub fn zip_map<F>(&self, other: &Raster<T>, f: F) -> Result<Raster<T>>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape() != other.shape() {
            let (rows, cols) = self.shape();
            return Err(Error::SizeMismatch {
                expected: rows * cols,
                actual: other.len(),
            });
        }
        let data = ndarray::Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|&a, &b| f(a, b));
        Ok(Self { data })
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of comparable cells)
    ///
    /// NaN samples are counted as invalid.
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            // NaN is the only sample not comparable to itself
            if value.partial_cmp(&value).is_none() {
                continue;
            }

            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }

            if let Some(v) = RasterElement::to_f64(value) {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            invalid_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub invalid_count: usize,
}
