use std::io::{Seek, Write};

use ::tiff::encoder::colortype::{self, ColorType};
use ::tiff::encoder::{Compression, Predictor, TiffEncoder, TiffValue};
use ::tiff::tags::Tag;
use ::tiff::TiffResult;
use image::DynamicImage;

use crate::encoders::common::to_integer_precision;
use crate::params::TiffCompression;
use crate::{codec_err, codec_try, error::ConvertError, image_rs::Image};

/// Writes a TIFF through the `tiff` crate, since image-rs only writes uncompressed ones.
/// Quality only matters for lossy TIFF compressions, none of which are requested,
/// so it is ignored.
pub fn encode<W: Write + Seek>(
    image: &Image,
    writer: &mut W,
    compression: TiffCompression,
) -> Result<(), ConvertError> {
    let compression = match compression {
        TiffCompression::Lzw => Compression::Lzw,
    };
    let icc = image.icc.as_deref();
    let pixels = to_integer_precision(&image.pixels);
    let (width, height) = (pixels.width(), pixels.height());
    let result = match &*pixels {
        DynamicImage::ImageLuma8(buf) => {
            write::<colortype::Gray8, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        DynamicImage::ImageRgb8(buf) => {
            write::<colortype::RGB8, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        DynamicImage::ImageRgba8(buf) => {
            write::<colortype::RGBA8, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        DynamicImage::ImageLuma16(buf) => {
            write::<colortype::Gray16, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        DynamicImage::ImageRgb16(buf) => {
            write::<colortype::RGB16, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        DynamicImage::ImageRgba16(buf) => {
            write::<colortype::RGBA16, _>(writer, compression, icc, width, height, buf.as_raw())
        }
        // gray + alpha has no TIFF color type here
        DynamicImage::ImageLumaA8(_) => {
            let rgba = pixels.to_rgba8();
            write::<colortype::RGBA8, _>(writer, compression, icc, width, height, rgba.as_raw())
        }
        DynamicImage::ImageLumaA16(_) => {
            let rgba = pixels.to_rgba16();
            write::<colortype::RGBA16, _>(writer, compression, icc, width, height, rgba.as_raw())
        }
        other => return Err(codec_err!("cannot write {:?} pixels as TIFF", other.color())),
    };
    codec_try!(result);
    Ok(())
}

fn write<C, W>(
    writer: W,
    compression: Compression,
    icc: Option<&[u8]>,
    width: u32,
    height: u32,
    data: &[C::Inner],
) -> TiffResult<()>
where
    C: ColorType,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    let mut encoder = TiffEncoder::new(writer)?
        .with_compression(compression)
        .with_predictor(Predictor::Horizontal);
    let mut image = encoder.new_image::<C>(width, height)?;
    if let Some(icc) = icc {
        image.encoder().write_tag(Tag::IccProfile, icc)?;
    }
    image.write_data(data)
}
