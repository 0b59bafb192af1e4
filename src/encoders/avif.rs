use std::io::Write;

use image::codecs::avif::AvifEncoder;

use crate::encoders::common::write_icc;
use crate::{codec_try, error::ConvertError, image_rs::Image};

/// Maps effort (0 fastest, 9 slowest) onto ravif's speed (10 fastest, 1 slowest).
fn effort_to_speed(effort: u8) -> u8 {
    10u8.saturating_sub(effort).clamp(1, 10)
}

pub fn encode<W: Write>(
    image: &Image,
    writer: &mut W,
    quality: u8,
    effort: u8,
) -> Result<(), ConvertError> {
    let mut encoder = AvifEncoder::new_with_speed_quality(writer, effort_to_speed(effort), quality);
    write_icc(&mut encoder, image);
    // ravif already discards alpha channel automatically if all pixels are opaque,
    // so no need to explicitly convert on our end
    codec_try!(image.pixels.write_with_encoder(encoder));
    Ok(())
}
