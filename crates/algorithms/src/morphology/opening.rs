//! Morphological opening (erosion followed by dilation)
//!
//! Removes small bright features (noise, spikes) while preserving
//! the overall shape and size of larger bright regions.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, RasterElement, Result};

use super::dilate::dilate_raster_with;
use super::element::StructuringElement;
use super::engine::MorphologyOptions;
use super::erode::erode_raster_with;

/// Parameters for morphological opening
#[derive(Debug, Clone, Default)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Opening algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Opening<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for Opening<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to remove small bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        opening_with(&input, &params.element, &params.options)
    }
}

/// Perform morphological opening on a raster
///
/// Opening = erode then dilate with the same element. Removes bright
/// features the element does not fit into while leaving larger structures.
pub fn opening<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    opening_with(raster, element, &MorphologyOptions::default())
}

/// [`opening`] with explicit chord policy and processing mode
pub fn opening_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let eroded = erode_raster_with(raster, element, options)?;
    dilate_raster_with(&eroded, element, options)
}
