//! Grayscale TIFF reading and writing
//!
//! This is the codec collaborator of the command line front end. The
//! morphology algorithms only ever see [`Raster`](crate::Raster) values.

mod native;

pub use native::{
    read_tiff, read_tiff_from_buffer, read_tiff_with_format, write_tiff, write_tiff_to_buffer,
    SampleFormat, TiffOptions,
};
