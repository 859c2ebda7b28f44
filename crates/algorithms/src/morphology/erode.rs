//! Morphological erosion (minimum filter)
//!
//! Replaces each pixel with the minimum value in its structuring element
//! neighborhood. Shrinks bright regions and enlarges dark regions.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, ParallelAlgorithm, RasterElement, Result};

use super::element::StructuringElement;
use super::engine::{morphology, MorphOp, MorphologyOptions, ProcessingMode};

/// Parameters for morphological erosion
#[derive(Debug, Clone, Default)]
pub struct ErodeParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Erosion algorithm over rasters of `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct Erode<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for Erode<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Morphological erosion (minimum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        erode_raster_with(&input, &params.element, &params.options)
    }
}

impl<T: RasterElement> ParallelAlgorithm for Erode<T> {
    fn execute_parallel(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let options = params.options.with_mode(ProcessingMode::Parallel);
        erode_raster_with(&input, &params.element, &options)
    }
}

/// Erode a row-major sample buffer of `width x height` samples
///
/// Each output sample is the minimum over the element placed at that
/// sample. Offsets falling outside the image never lower the result.
pub fn erode<T: RasterElement>(
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
) -> Result<Vec<T>> {
    erode_with(samples, width, height, element, &MorphologyOptions::default())
}

/// [`erode`] with explicit chord policy and processing mode
pub fn erode_with<T: RasterElement>(
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Vec<T>> {
    morphology(MorphOp::Erode, samples, width, height, element, options)
}

/// Perform morphological erosion on a raster
pub fn erode_raster<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    erode_raster_with(raster, element, &MorphologyOptions::default())
}

/// [`erode_raster`] with explicit chord policy and processing mode
pub fn erode_raster_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let (rows, cols) = raster.shape();
    let data = erode_with(&raster.samples(), cols, rows, element, options)?;
    Raster::from_vec(data, rows, cols)
}
