//! Morphological dilation (maximum filter)
//!
//! Replaces each pixel with the maximum value in its structuring element
//! neighborhood. Enlarges bright regions and shrinks dark regions.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, ParallelAlgorithm, RasterElement, Result};

use super::element::StructuringElement;
use super::engine::{morphology, MorphOp, MorphologyOptions, ProcessingMode};

/// Parameters for morphological dilation
#[derive(Debug, Clone, Default)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Dilation algorithm over rasters of `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct Dilate<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for Dilate<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Morphological dilation (maximum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate_raster_with(&input, &params.element, &params.options)
    }
}

impl<T: RasterElement> ParallelAlgorithm for Dilate<T> {
    fn execute_parallel(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let options = params.options.with_mode(ProcessingMode::Parallel);
        dilate_raster_with(&input, &params.element, &options)
    }
}

/// Dilate a row-major sample buffer of `width x height` samples
///
/// Each output sample is the maximum over the element placed at that
/// sample. Offsets falling outside the image never raise the result.
pub fn dilate<T: RasterElement>(
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
) -> Result<Vec<T>> {
    dilate_with(samples, width, height, element, &MorphologyOptions::default())
}

/// [`dilate`] with explicit chord policy and processing mode
pub fn dilate_with<T: RasterElement>(
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Vec<T>> {
    morphology(MorphOp::Dilate, samples, width, height, element, options)
}

/// Perform morphological dilation on a raster
pub fn dilate_raster<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    dilate_raster_with(raster, element, &MorphologyOptions::default())
}

/// [`dilate_raster`] with explicit chord policy and processing mode
pub fn dilate_raster_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let (rows, cols) = raster.shape();
    let data = dilate_with(&raster.samples(), cols, rows, element, options)?;
    Raster::from_vec(data, rows, cols)
}
