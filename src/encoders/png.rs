use std::io::Write;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::encoders::common::{to_integer_precision, write_icc};
use crate::{codec_try, error::ConvertError, image_rs::Image};

/// Lossless PNG. `quality` only matters for palette quantisation, which is not
/// performed, and image-rs writes non-interlaced files only.
pub fn encode<W: Write>(
    image: &Image,
    writer: &mut W,
    compression_level: u8,
    progressive: bool,
) -> Result<(), ConvertError> {
    if progressive {
        tracing::debug!("writing non-interlaced PNG");
    }
    let mut encoder = PngEncoder::new_with_quality(
        writer,
        level_to_compression(compression_level),
        FilterType::Adaptive,
    );
    write_icc(&mut encoder, image);
    let pixels = to_integer_precision(&image.pixels);
    codec_try!(pixels.write_with_encoder(encoder));
    Ok(())
}

/// zlib levels 0-9 onto the presets image-rs offers.
fn level_to_compression(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}
