//! # chordmorph algorithms
//!
//! Grayscale erosion and dilation with arbitrary flat structuring elements,
//! plus the compound operators built on them (opening, closing, gradient,
//! top-hat, black-hat).
//!
//! The `parallel` feature (on by default) splits the image into horizontal
//! bands processed with rayon; without it every mode runs sequentially.

mod maybe_rayon;
pub mod morphology;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::morphology::{
        black_hat, closing, dilate, dilate_raster, erode, erode_raster, gradient, morphology,
        opening, top_hat, ChordPolicy, MorphOp, MorphologyOptions, ProcessingMode,
        StructuringElement,
    };
    pub use chordmorph_core::prelude::*;
}
