//! Morphological gradient (dilation minus erosion)
//!
//! Highlights edges and boundaries by computing the difference between
//! the dilation and erosion of the input. The result is always non-negative.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, RasterElement, Result};

use super::dilate::dilate_raster_with;
use super::element::StructuringElement;
use super::engine::MorphologyOptions;
use super::erode::erode_raster_with;

/// Parameters for morphological gradient
#[derive(Debug, Clone, Default)]
pub struct GradientParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Morphological gradient algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Gradient<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for Gradient<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = GradientParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MorphologicalGradient"
    }

    fn description(&self) -> &'static str {
        "Morphological gradient (dilation minus erosion) for edge detection"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        gradient_with(&input, &params.element, &params.options)
    }
}

/// Compute the morphological gradient of a raster
///
/// Gradient = dilate - erode, saturating at zero.
pub fn gradient<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    gradient_with(raster, element, &MorphologyOptions::default())
}

/// [`gradient`] with explicit chord policy and processing mode
pub fn gradient_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let dilated = dilate_raster_with(raster, element, options)?;
    let eroded = erode_raster_with(raster, element, options)?;
    dilated.zip_map(&eroded, T::saturating_diff)
}
