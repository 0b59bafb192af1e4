use std::io::Write;

use image::codecs::gif::GifEncoder;
use image::ExtendedColorType;

use crate::{codec_try, error::ConvertError, image_rs::Image};

/// Maps effort (1 fastest, 10 slowest) onto the NeuQuant sampling speed
/// (30 fastest, 1 best quality).
fn effort_to_speed(effort: u8) -> i32 {
    (31 - 3 * i32::from(effort)).clamp(1, 30)
}

pub fn encode<W: Write>(image: &Image, writer: &mut W, effort: u8) -> Result<(), ConvertError> {
    let mut encoder = GifEncoder::new_with_speed(writer, effort_to_speed(effort));
    // the GIF encoder only accepts 8-bit RGB(A) buffers
    let rgba = image.pixels.to_rgba8();
    codec_try!(encoder.encode(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8
    ));
    Ok(())
}
