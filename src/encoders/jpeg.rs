use std::io::Write;

use image::codecs::jpeg::JpegEncoder;

use crate::encoders::common::{to_8bit_opaque, write_icc};
use crate::{codec_try, error::ConvertError, image_rs::Image};

/// Baseline JPEG at the given quality.
///
/// The `image` encoder has neither progressive scans nor trellis quantisation,
/// so those two knobs are accepted and logged but have no effect on the output.
pub fn encode<W: Write>(
    image: &Image,
    writer: &mut W,
    quality: u8,
    progressive: bool,
    mozjpeg: bool,
) -> Result<(), ConvertError> {
    if progressive || mozjpeg {
        tracing::debug!(progressive, mozjpeg, "writing baseline JPEG");
    }
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    write_icc(&mut encoder, image);
    // JPEG has no alpha channel and only 8-bit samples
    let pixels = to_8bit_opaque(&image.pixels);
    codec_try!(pixels.write_with_encoder(encoder));
    Ok(())
}
