//! Morphological closing (dilation followed by erosion)
//!
//! Fills small dark gaps and holes while preserving the overall shape
//! of larger dark regions.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, RasterElement, Result};

use super::dilate::dilate_raster_with;
use super::element::StructuringElement;
use super::engine::MorphologyOptions;
use super::erode::erode_raster_with;

/// Parameters for morphological closing
#[derive(Debug, Clone, Default)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Closing algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Closing<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for Closing<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to fill small dark gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        closing_with(&input, &params.element, &params.options)
    }
}

/// Perform morphological closing on a raster
///
/// Closing = dilate then erode with the same element.
pub fn closing<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    closing_with(raster, element, &MorphologyOptions::default())
}

/// [`closing`] with explicit chord policy and processing mode
pub fn closing_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let dilated = dilate_raster_with(raster, element, options)?;
    erode_raster_with(&dilated, element, options)
}
