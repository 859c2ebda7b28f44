//! Native single-channel TIFF reading/writing
//!
//! Uses the `tiff` crate. Multi-channel images are rejected; apply the
//! operators per channel upstream.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{ColorType, Gray16, Gray32Float, Gray64Float, Gray8};
use tiff::encoder::TiffEncoder;
use tiff::ColorType as DecodedColorType;

/// On-disk sample encoding of a grayscale TIFF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleFormat {
    /// Short lowercase name, e.g. `"u16"`
    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::U8 => "u8",
            SampleFormat::U16 => "u16",
            SampleFormat::U32 => "u32",
            SampleFormat::I8 => "i8",
            SampleFormat::I16 => "i16",
            SampleFormat::I32 => "i32",
            SampleFormat::F32 => "f32",
            SampleFormat::F64 => "f64",
        }
    }
}

/// Options for writing TIFF files
#[derive(Debug, Clone)]
pub struct TiffOptions {
    /// Sample encoding of the written image.
    ///
    /// Only `U8`, `U16`, `F32` and `F64` can be written; other formats fall
    /// back to `F64`. Values that do not fit the target encoding are clamped
    /// to its range.
    pub format: SampleFormat,
}

impl Default for TiffOptions {
    fn default() -> Self {
        Self {
            format: SampleFormat::F32,
        }
    }
}

/// Read a single-channel TIFF file into a Raster
pub fn read_tiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    read_tiff_with_format(path).map(|(raster, _)| raster)
}

/// Read a single-channel TIFF file, also reporting its on-disk sample format
pub fn read_tiff_with_format<T, P>(path: P) -> Result<(Raster<T>, SampleFormat)>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_tiff(file)
}

/// Read a TIFF from an in-memory buffer into a Raster
pub fn read_tiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_tiff(Cursor::new(data)).map(|(raster, _)| raster)
}

fn cast_all<S, T>(buf: Vec<S>) -> Result<Vec<T>>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| {
            num_traits::cast(v).ok_or_else(|| {
                Error::UnsupportedDataType(
                    "TIFF sample does not fit the requested raster type".to_string(),
                )
            })
        })
        .collect()
}

/// Internal: decode a TIFF from any `Read + Seek` source
fn decode_tiff<T, R>(reader: R) -> Result<(Raster<T>, SampleFormat)>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let colortype = decoder
        .colortype()
        .map_err(|e| Error::Other(format!("Cannot read color type: {}", e)))?;
    if !matches!(colortype, DecodedColorType::Gray(_)) {
        return Err(Error::UnsupportedDataType(format!(
            "only single-channel images are supported, got {:?}",
            colortype
        )));
    }

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let (data, format): (Vec<T>, SampleFormat) = match result {
        DecodingResult::U8(buf) => (cast_all(buf)?, SampleFormat::U8),
        DecodingResult::U16(buf) => (cast_all(buf)?, SampleFormat::U16),
        DecodingResult::U32(buf) => (cast_all(buf)?, SampleFormat::U32),
        DecodingResult::I8(buf) => (cast_all(buf)?, SampleFormat::I8),
        DecodingResult::I16(buf) => (cast_all(buf)?, SampleFormat::I16),
        DecodingResult::I32(buf) => (cast_all(buf)?, SampleFormat::I32),
        DecodingResult::F32(buf) => (cast_all(buf)?, SampleFormat::F32),
        DecodingResult::F64(buf) => (cast_all(buf)?, SampleFormat::F64),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    Ok((Raster::from_vec(data, rows, cols)?, format))
}

/// Write a Raster to a TIFF file
pub fn write_tiff<T, P>(raster: &Raster<T>, path: P, options: Option<TiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_tiff(raster, file, &options.unwrap_or_default())
}

/// Write a Raster to an in-memory TIFF buffer
pub fn write_tiff_to_buffer<T>(raster: &Raster<T>, options: Option<TiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_tiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

/// Cast a sample into the target encoding, clamping to its range
fn clamp_cast<T, U>(value: T) -> U
where
    T: RasterElement,
    U: RasterElement,
{
    num_traits::cast(value).unwrap_or_else(|| {
        if value > T::zero() {
            U::max_value()
        } else {
            U::min_value()
        }
    })
}

fn write_as<C, T, W>(encoder: &mut TiffEncoder<W>, raster: &Raster<T>) -> Result<()>
where
    C: ColorType,
    C::Inner: RasterElement,
    [C::Inner]: tiff::encoder::TiffValue,
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let (rows, cols) = raster.shape();
    let data: Vec<C::Inner> = raster.data().iter().map(|&v| clamp_cast(v)).collect();
    encoder
        .write_image::<C>(cols as u32, rows as u32, &data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))
}

/// Internal: encode a Raster as TIFF into any `Write + Seek` sink
fn encode_tiff<T, W>(raster: &Raster<T>, writer: W, options: &TiffOptions) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    if raster.is_empty() {
        let (rows, cols) = raster.shape();
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    match options.format {
        SampleFormat::U8 => write_as::<Gray8, _, _>(&mut encoder, raster),
        SampleFormat::U16 => write_as::<Gray16, _, _>(&mut encoder, raster),
        SampleFormat::F32 => write_as::<Gray32Float, _, _>(&mut encoder, raster),
        _ => write_as::<Gray64Float, _, _>(&mut encoder, raster),
    }
}
