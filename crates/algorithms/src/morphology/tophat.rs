//! Top-hat and black-hat morphological transforms
//!
//! - **Top-hat** (white top-hat): original - opening. Extracts small bright
//!   features on a dark background.
//! - **Black-hat**: closing - original. Extracts small dark features on a
//!   bright background.

use std::marker::PhantomData;

use chordmorph_core::raster::Raster;
use chordmorph_core::{Algorithm, Error, RasterElement, Result};

use super::closing::closing_with;
use super::element::StructuringElement;
use super::engine::MorphologyOptions;
use super::opening::opening_with;

/// Parameters for top-hat transform
#[derive(Debug, Clone, Default)]
pub struct TopHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Top-hat (white top-hat) algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct TopHat<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for TopHat<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = TopHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "TopHat"
    }

    fn description(&self) -> &'static str {
        "Top-hat transform (original minus opening) to extract bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        top_hat_with(&input, &params.element, &params.options)
    }
}

/// Parameters for black-hat transform
#[derive(Debug, Clone, Default)]
pub struct BlackHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
    pub options: MorphologyOptions,
}

/// Black-hat algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackHat<T = f64> {
    _sample: PhantomData<T>,
}

impl<T: RasterElement> Algorithm for BlackHat<T> {
    type Input = Raster<T>;
    type Output = Raster<T>;
    type Params = BlackHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "BlackHat"
    }

    fn description(&self) -> &'static str {
        "Black-hat transform (closing minus original) to extract dark features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        black_hat_with(&input, &params.element, &params.options)
    }
}

/// Compute the top-hat (white top-hat) transform
///
/// Top-hat = original - opening. Extracts bright features smaller than
/// the structuring element.
pub fn top_hat<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    top_hat_with(raster, element, &MorphologyOptions::default())
}

/// [`top_hat`] with explicit chord policy and processing mode
pub fn top_hat_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let opened = opening_with(raster, element, options)?;
    raster.zip_map(&opened, T::saturating_diff)
}

/// Compute the black-hat transform
///
/// Black-hat = closing - original. Extracts dark features smaller than
/// the structuring element.
pub fn black_hat<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
) -> Result<Raster<T>> {
    black_hat_with(raster, element, &MorphologyOptions::default())
}

/// [`black_hat`] with explicit chord policy and processing mode
pub fn black_hat_with<T: RasterElement>(
    raster: &Raster<T>,
    element: &StructuringElement,
    options: &MorphologyOptions,
) -> Result<Raster<T>> {
    let closed = closing_with(raster, element, options)?;
    closed.zip_map(raster, T::saturating_diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spots(background: u8, spot: u8) -> Raster<u8> {
        let mut raster = Raster::filled(11, 11, background);
        raster.set(5, 5, spot).unwrap();
        raster
    }

    #[test]
    fn test_top_hat_extracts_bright_spot() {
        let raster = spots(10, 90);
        let result = top_hat(&raster, &StructuringElement::square(1).unwrap()).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 80);
        assert_eq!(result.get(5, 6).unwrap(), 0);
        assert_eq!(result.data().iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_top_hat_ignores_dark_spot() {
        let raster = spots(90, 10);
        let result = top_hat(&raster, &StructuringElement::square(1).unwrap()).unwrap();
        assert!(result.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_black_hat_extracts_dark_spot() {
        let raster = spots(90, 10);
        let result = black_hat(&raster, &StructuringElement::square(1).unwrap()).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 80);
        assert_eq!(result.data().iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_black_hat_algorithm_trait() {
        let raster = spots(90, 10);
        let params = BlackHatParams {
            element: StructuringElement::cross(1).unwrap(),
            ..Default::default()
        };
        let algo = BlackHat::<u8>::default();
        assert_eq!(algo.name(), "BlackHat");
        let result = algo.execute(raster, params).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 80);
    }
}
