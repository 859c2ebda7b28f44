//! Grayscale mathematical morphology by chord decomposition
//!
//! Each structuring element is split into horizontal runs (chords). For every
//! output row a lookup table holds, per source row of the element's vertical
//! span, the running min/max over windows of every chord length the element
//! needs. Each output pixel then costs one lookup per chord, independent of
//! the chord lengths.
//!
//! Operations:
//! - **Erosion**: minimum filter (shrinks bright regions)
//! - **Dilation**: maximum filter (expands bright regions)
//! - **Opening**: erosion then dilation (removes small bright features)
//! - **Closing**: dilation then erosion (fills small dark gaps)
//! - **Gradient**: dilation minus erosion (edge detection)
//! - **Top-hat**: original minus opening (bright feature extraction)
//! - **Black-hat**: closing minus original (dark feature extraction)

mod chord;
mod closing;
mod combiner;
mod context;
mod dilate;
mod element;
mod engine;
mod erode;
mod gradient;
mod opening;
mod table;
mod tophat;

pub use chord::{decompose_chords, Chord};
pub use closing::{closing, closing_with, Closing, ClosingParams};
pub use combiner::RowCombiner;
pub use context::{ChordLadder, ChordPolicy, GeometryBounds, MorphologyContext};
pub use dilate::{dilate, dilate_raster, dilate_raster_with, dilate_with, Dilate, DilateParams};
pub use element::StructuringElement;
pub use engine::{morphology, MorphOp, MorphologyOptions, ProcessingMode};
pub use erode::{erode, erode_raster, erode_raster_with, erode_with, Erode, ErodeParams};
pub use gradient::{gradient, gradient_with, Gradient, GradientParams};
pub use opening::{opening, opening_with, Opening, OpeningParams};
pub use table::RowLookupTable;
pub use tophat::{
    black_hat, black_hat_with, top_hat, top_hat_with, BlackHat, BlackHatParams, TopHat,
    TopHatParams,
};
